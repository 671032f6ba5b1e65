// src/extractors/districts.rs
use crate::extractors::cells::{join_cells, locate_role, CellRole, INDEX_SECTIONS};
use crate::utils::error::ExtractError;
use crate::volby::District;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile LINK_SELECTOR")
});

/// Reads the district list from an index page.
///
/// Code and name cells are paired by table section and row. A code cell
/// without a link (filler rows use a bare `-`) drops its whole row.
pub fn extract_districts(document: &Html) -> Result<Vec<District>, ExtractError> {
    let codes = locate_role(document, CellRole::DistrictCode, &INDEX_SECTIONS)?;
    let names = locate_role(document, CellRole::DistrictName, &INDEX_SECTIONS)?;

    let mut districts = Vec::new();
    for (code_cell, name_cell) in join_cells(&codes, &names, &INDEX_SECTIONS)? {
        let Some(link) = code_cell.element.select(&LINK_SELECTOR).next() else {
            tracing::trace!("Skipping row {} of section {}: {:?} cell has no link", code_cell.position, code_cell.section, code_cell.role);
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            tracing::debug!("Skipping row {} of section {}: link without href", code_cell.position, code_cell.section);
            continue;
        };
        districts.push(District {
            code: link.text().collect(),
            name: name_cell.text(),
            detail_link: href.to_string(),
        });
    }

    tracing::debug!("Extracted {} districts", districts.len());
    Ok(districts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(section: u8, code: &str, name: &str) -> String {
        format!(
            r#"<tr><td class="cislo" headers="t{s}sa1 t{s}sb1"><a href="ps311?xobec={c}">{c}</a></td><td class="overflow_name" headers="t{s}sa1 t{s}sb2">{n}</td><td headers="t{s}sa2"><a href="ps311?xobec={c}">X</a></td></tr>"#,
            s = section,
            c = code,
            n = name
        )
    }

    fn page(tables: &[Vec<String>]) -> Html {
        let body: String = tables
            .iter()
            .map(|rows| format!("<table>{}</table>", rows.concat()))
            .collect();
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn test_extracts_every_linked_code_in_order() {
        let doc = page(&[
            vec![row(1, "529303", "Benešov"), row(1, "532568", "Bernartice")],
            vec![row(2, "530743", "Bílkovice")],
            vec![row(3, "532380", "Blažejovice")],
        ]);
        let districts = extract_districts(&doc).unwrap();
        let codes: Vec<&str> = districts.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["529303", "532568", "530743", "532380"]);
        assert_eq!(districts[2].name, "Bílkovice");
        assert_eq!(districts[3].detail_link, "ps311?xobec=532380");
        assert!(districts.iter().all(|d| !d.code.is_empty() && !d.name.is_empty() && !d.detail_link.is_empty()));
    }

    #[test]
    fn test_filler_row_is_skipped_with_its_name() {
        let filler = r#"<tr><td class="cislo" headers="t1sa1 t1sb1">-</td><td headers="t1sa1 t1sb2">-</td></tr>"#;
        let doc = page(&[vec![filler.to_string(), row(1, "529303", "Benešov")]]);
        let districts = extract_districts(&doc).unwrap();
        assert_eq!(
            districts,
            vec![District {
                code: "529303".to_string(),
                name: "Benešov".to_string(),
                detail_link: "ps311?xobec=529303".to_string(),
            }]
        );
    }

    #[test]
    fn test_page_without_cells_yields_nothing() {
        let doc = Html::parse_document("<html><body><p>Nic</p></body></html>");
        assert!(extract_districts(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_missing_name_cell_is_an_alignment_error() {
        let orphan = r#"<tr><td headers="t2sa1 t2sb1"><a href="ps311?xobec=1">1</a></td></tr>"#;
        let doc = page(&[vec![row(1, "529303", "Benešov")], vec![orphan.to_string()]]);
        let err = extract_districts(&doc).unwrap_err();
        assert!(matches!(err, ExtractError::Alignment { section: 2, .. }));
    }
}
