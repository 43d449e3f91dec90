use serde::Serialize;

use glowmatch_core::CategoryCatalog;

#[derive(Debug, Serialize)]
struct CatalogEntry<'a> {
    id: &'a str,
    display_name: &'a str,
    photo_keywords: &'a [String],
    issue_keywords: &'a [String],
}

pub fn run(json_output: bool) -> String {
    let catalog = CategoryCatalog::builtin();

    if json_output {
        let entries: Vec<CatalogEntry<'_>> = catalog
            .categories()
            .iter()
            .map(|compiled| CatalogEntry {
                id: compiled.category.id.as_str(),
                display_name: &compiled.category.display_name,
                photo_keywords: &compiled.category.maps_to_photos,
                issue_keywords: &compiled.category.maps_to_specific_issues,
            })
            .collect();
        return serde_json::to_string_pretty(&entries)
            .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
    }

    let mut lines = vec![format!("{} concern categories:", catalog.categories().len())];
    for compiled in catalog.categories() {
        lines.push(String::new());
        lines.push(format!("{} ({})", compiled.category.display_name, compiled.category.id));
        lines.push(format!("  photo keywords: {}", compiled.category.maps_to_photos.join(", ")));
        if compiled.category.maps_to_specific_issues.is_empty() {
            lines.push("  issue keywords: (none; issue matching skipped)".to_string());
        } else {
            lines.push(format!(
                "  issue keywords: {}",
                compiled.category.maps_to_specific_issues.join(", ")
            ));
        }
    }

    lines.join("\n")
}
