use datedice_core::{load_catalog, ActivityCatalog, AppConfig};

/// Print the catalog resolved for the configured feature tier.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or fails validation.
pub(crate) fn run_catalog(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path, config.feature_tier)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        for line in format_catalog(&catalog) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn format_catalog(catalog: &ActivityCatalog) -> Vec<String> {
    let mut lines = vec![
        format!("tier: {}", catalog.tier),
        String::new(),
        format!("terms ({}):", catalog.terms.len()),
    ];
    lines.extend(catalog.terms.iter().map(|term| format!("  {term}")));

    lines.push(String::new());
    lines.push(format!("categories ({}):", catalog.categories.len()));
    lines.push(format!("  {:<22}SEARCH PHRASE", "NAME"));
    lines.extend(
        catalog
            .categories
            .iter()
            .map(|c| format!("  {:<22}{}", c.display_name(), c.search_phrase())),
    );
    lines
}
