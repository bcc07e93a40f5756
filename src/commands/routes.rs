use crate::i18n::{Catalog, Localizer};
use crate::routes::FlatRoutes;
use crate::settings::Language;
use anyhow::Result;
use log::info;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRow<'a> {
    key: &'a str,
    path: &'a str,
    label_key: &'a str,
    label: String,
    navigable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    param: Option<&'a str>,
}

/// Print the flattened route table
pub fn routes_command(language: Language, json: bool) -> Result<()> {
    let i18n = Catalog::builtin(language)?;
    let flat = FlatRoutes::global();
    info!("Listing {} routes", flat.len());

    let rows: Vec<RouteRow> = flat
        .iter()
        .map(|route| RouteRow {
            key: route.key.as_str(),
            path: route.path,
            label_key: route.label_key,
            label: i18n.resolve(route.label_key),
            navigable: route.is_navigable(),
            param: route.param_schema.map(|schema| schema.field),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let width = rows.iter().map(|row| row.path.len()).max().unwrap_or(0);
    for row in &rows {
        let mut line = format!("{:<width$}  {}", row.path, row.label, width = width);
        if let Some(param) = row.param {
            line.push_str(&format!(" ({})", param));
        }
        if !row.navigable {
            line.push_str(" [group]");
        }
        println!("{}", line);
    }
    println!("\nTotal routes: {}", rows.len());
    Ok(())
}

/// Print the breadcrumb chain for a path
pub fn breadcrumbs_command(language: Language, path: &str) -> Result<()> {
    let i18n = Catalog::builtin(language)?;
    let flat = FlatRoutes::global();

    if flat.find_by_path(path).is_none() {
        println!("{}: {}", i18n.resolve("common.not_found"), path);
    }

    let trail: Vec<String> = flat
        .breadcrumbs(path)
        .into_iter()
        .map(|crumb| format!("{} ({})", i18n.resolve(&crumb.label_key), crumb.path))
        .collect();
    println!("{}", trail.join(" > "));
    Ok(())
}
