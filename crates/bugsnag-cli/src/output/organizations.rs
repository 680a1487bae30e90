// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::OrganizationsResult;

use super::Renderable;

impl Renderable for OrganizationsResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        for org in &self.organizations {
            writeln!(
                w,
                "{} {}  {}",
                style(&org.name).cyan(),
                style(format!("({})", org.id)).dim(),
                org.slug
            )?;
        }
        Ok(())
    }
}
