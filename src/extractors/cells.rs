// src/extractors/cells.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use scraper::{ElementRef, Html, Selector};

// --- Constants ---
/// Table sections of a district list page.
pub const INDEX_SECTIONS: [u8; 3] = [1, 2, 3];
/// Table sections carrying party rows on a district results page. The third
/// section of that page has no party names.
pub const PARTY_SECTIONS: [u8; 2] = [1, 2];

/// What a cell holds. The site tags each `td` with a `headers` attribute
/// naming its table section and column; that attribute is the only reliable
/// way to tell cells apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    DistrictCode,
    DistrictName,
    PartyName,
    PartyVotes,
}

impl CellRole {
    /// The `headers` attribute value for this role in table section `section`.
    pub fn identifier(self, section: u8) -> String {
        match self {
            CellRole::DistrictCode => format!("t{section}sa1 t{section}sb1"),
            CellRole::DistrictName | CellRole::PartyName => format!("t{section}sa1 t{section}sb2"),
            CellRole::PartyVotes => format!("t{section}sa2 t{section}sb3"),
        }
    }
}

/// A located cell, keyed by where it sits in the page.
#[derive(Debug, Clone)]
pub struct Cell<'a> {
    pub role: CellRole,
    pub section: u8,
    pub position: usize,
    pub element: ElementRef<'a>,
}

impl Cell<'_> {
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}

/// Builds the selector for cells whose `headers` attribute equals `identifier`.
pub fn headers_selector(identifier: &str) -> Result<Selector, ExtractError> {
    Selector::parse(&format!(r#"td[headers="{}"]"#, identifier))
        .map_err(|e| ExtractError::Selector(format!("{}: {:?}", identifier, e)))
}

/// Returns all `td` cells tagged with any of `identifiers`.
///
/// Results are concatenated in identifier order; cells for one identifier come
/// back in document order.
pub fn locate<'a, S: AsRef<str>>(
    document: &'a Html,
    identifiers: &[S],
) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    let mut cells = Vec::new();
    for identifier in identifiers {
        let selector = headers_selector(identifier.as_ref())?;
        let before = cells.len();
        cells.extend(document.select(&selector));
        tracing::trace!("Located {} cells for '{}'", cells.len() - before, identifier.as_ref());
    }
    Ok(cells)
}

/// All cells of one role on a page.
#[derive(Debug, Clone)]
pub struct CellSet<'a> {
    pub role: CellRole,
    pub cells: Vec<Cell<'a>>,
}

impl<'a> CellSet<'a> {
    fn in_section(&self, section: u8) -> Vec<&Cell<'a>> {
        self.cells.iter().filter(|c| c.section == section).collect()
    }
}

/// Locates every cell of `role` across `sections`, recording section and
/// position within the section.
pub fn locate_role<'a>(
    document: &'a Html,
    role: CellRole,
    sections: &[u8],
) -> Result<CellSet<'a>, ExtractError> {
    let mut cells = Vec::new();
    for &section in sections {
        let found = locate(document, &[role.identifier(section)])?;
        cells.extend(found.into_iter().enumerate().map(|(position, element)| Cell {
            role,
            section,
            position,
            element,
        }));
    }
    Ok(CellSet { role, cells })
}

/// Pairs two cell sets by `(section, position)`.
///
/// Every section must contribute the same number of cells to both sides.
pub fn join_cells<'a>(
    left: &CellSet<'a>,
    right: &CellSet<'a>,
    sections: &[u8],
) -> Result<Vec<(Cell<'a>, Cell<'a>)>, ExtractError> {
    let mut pairs = Vec::with_capacity(left.cells.len());
    for &section in sections {
        let lhs = left.in_section(section);
        let rhs = right.in_section(section);
        if lhs.len() != rhs.len() {
            return Err(ExtractError::Alignment {
                section,
                left: left.role,
                left_count: lhs.len(),
                right: right.role,
                right_count: rhs.len(),
            });
        }
        pairs.extend(lhs.into_iter().cloned().zip(rhs.into_iter().cloned()));
    }
    Ok(pairs)
}
