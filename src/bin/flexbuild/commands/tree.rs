//! `flexbuild tree` command

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::cli::TreeArgs;
use crate::commands::load_workspace;
use flexbuild::core::{ConfigurationId, Project};
use flexbuild::util::GlobalContext;

pub fn execute(args: TreeArgs, ctx: &GlobalContext) -> Result<()> {
    let ws = load_workspace(ctx)?;
    let project = ws.project();

    let modules: Vec<_> = match &args.module {
        Some(name) => match project.module(name) {
            Some(module) => vec![module.clone()],
            None => bail!("module `{}` not found in project `{}`", name, project.name()),
        },
        None => project.modules().to_vec(),
    };

    let mut seen = HashSet::new();
    for module in &modules {
        for bc in module.configurations() {
            let id = ConfigurationId::new(module.name(), &bc.name);
            print_tree(project, &id, 0, args.depth.unwrap_or(usize::MAX), &mut seen);
        }
    }

    Ok(())
}

/// Print one configuration and its configuration dependencies.
///
/// Configurations already printed are marked `(*)` and not expanded again.
fn print_tree(project: &Project, id: &ConfigurationId, depth: usize, max_depth: usize, seen: &mut HashSet<ConfigurationId>) {
    if depth > max_depth {
        return;
    }

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };

    let Some((_, bc)) = project.find_configuration(&id.module, &id.configuration) else {
        println!("{}{}:{} (missing)", prefix, id.module, id.configuration);
        return;
    };

    let is_duplicate = !seen.insert(id.clone());
    let skip_marker = if bc.skip_compile { " [skip]" } else { "" };
    let dup_marker = if is_duplicate { " (*)" } else { "" };
    println!(
        "{}{}:{} ({}){}{}",
        prefix,
        id.module,
        id.configuration,
        bc.output_type,
        skip_marker,
        dup_marker
    );

    if is_duplicate {
        return;
    }

    for entry in bc.dependencies.iter().filter_map(|d| d.as_configuration()) {
        let dep = ConfigurationId::new(&entry.module, &entry.configuration);
        print_tree(project, &dep, depth + 1, max_depth, seen);
    }
}
