// src/extractors/results.rs

// --- Imports ---
use crate::extractors::cells::{join_cells, locate_role, CellRole, PARTY_SECTIONS};
use crate::utils::error::ExtractError;
use crate::volby::District;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// --- Constants ---
pub const FIXED_COLUMNS: [&str; 5] = ["code", "location", "registered", "envelopes", "valid"];
/// Cell text the site uses for an empty party slot. Surrounding whitespace is
/// ignored when comparing.
pub const PLACEHOLDER: &str = "-";

// --- CSS Selectors (Lazy Static) ---
// Summary cells at the top of a district results page.
static REGISTERED_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"td[headers="sa2"]"#).expect("Failed to compile REGISTERED_SELECTOR")
});
static ENVELOPES_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"td[headers="sa3"]"#).expect("Failed to compile ENVELOPES_SELECTOR")
});
static VALID_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"td[headers="sa6"]"#).expect("Failed to compile VALID_SELECTOR")
});

/// Parses a vote count as printed by the site.
///
/// Thousands are separated with U+00A0. Anything that is not a plain
/// non-negative integer after removing those counts as 0.
pub fn parse_count(text: &str) -> u64 {
    let cleaned: String = text.chars().filter(|&c| c != '\u{a0}').collect();
    cleaned.trim().parse().unwrap_or(0)
}

fn is_placeholder(text: &str) -> bool {
    text.trim() == PLACEHOLDER
}

fn summary_count(document: &Html, selector: &Selector) -> u64 {
    document
        .select(selector)
        .next()
        .map(|cell| parse_count(&cell.text().collect::<String>()))
        .unwrap_or(0)
}

/// Party names paired with their vote cells, placeholders removed.
fn party_votes(document: &Html) -> Result<Vec<(String, String)>, ExtractError> {
    let names = locate_role(document, CellRole::PartyName, &PARTY_SECTIONS)?;
    let votes = locate_role(document, CellRole::PartyVotes, &PARTY_SECTIONS)?;
    Ok(join_cells(&names, &votes, &PARTY_SECTIONS)?
        .into_iter()
        .map(|(name, votes)| (name.text(), votes.text()))
        .filter(|(name, _)| !is_placeholder(name))
        .collect())
}

// --- Data Structures ---
/// Output columns for one run: the fixed columns followed by the parties found
/// on the first district's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    parties: Vec<String>,
}

impl ColumnHeader {
    /// Derives the party columns from a district results page.
    pub fn derive(document: &Html) -> Result<Self, ExtractError> {
        let names = locate_role(document, CellRole::PartyName, &PARTY_SECTIONS)?;
        let parties: Vec<String> = names
            .cells
            .iter()
            .map(|cell| cell.text())
            .filter(|name| !is_placeholder(name))
            .collect();
        tracing::info!("Derived {} party columns", parties.len());
        Ok(Self { parties })
    }

    pub fn parties(&self) -> &[String] {
        &self.parties
    }

    pub fn columns(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.parties.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        FIXED_COLUMNS.len() + self.parties.len()
    }
}

/// One district's line of the output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub code: String,
    pub name: String,
    pub registered: u64,
    pub envelopes: u64,
    pub valid: u64,
    /// Votes in `ColumnHeader::parties` order.
    pub votes: Vec<u64>,
}

impl ResultRow {
    /// Extracts `district`'s results from its page.
    ///
    /// The page must list the header's parties in the header's order. A party
    /// the header does not know is skipped when its vote cell is the
    /// placeholder (it was not on this district's ballot).
    pub fn extract(district: &District, document: &Html, header: &ColumnHeader) -> Result<Self, ExtractError> {
        let found = party_votes(document)?;

        let mut votes = Vec::with_capacity(header.parties.len());
        for (index, (name, count)) in found.iter().enumerate() {
            match header.parties.get(votes.len()) {
                Some(expected) if expected == name => votes.push(parse_count(count)),
                _ if is_placeholder(count) => {
                    tracing::trace!("Skipping uncontested party '{}'", name);
                }
                Some(expected) => {
                    return Err(ExtractError::PartyMismatch {
                        position: votes.len(),
                        expected: expected.clone(),
                        found: Some(name.clone()),
                    })
                }
                None => {
                    return Err(ExtractError::UnexpectedParties {
                        expected: header.parties.len(),
                        extra: found[index..].iter().filter(|(_, count)| !is_placeholder(count)).count(),
                    })
                }
            }
        }

        if let Some(expected) = header.parties.get(votes.len()) {
            return Err(ExtractError::PartyMismatch {
                position: votes.len(),
                expected: expected.clone(),
                found: None,
            });
        }

        Ok(Self {
            code: district.code.clone(),
            name: district.name.clone(),
            registered: summary_count(document, &REGISTERED_SELECTOR),
            envelopes: summary_count(document, &ENVELOPES_SELECTOR),
            valid: summary_count(document, &VALID_SELECTOR),
            votes,
        })
    }

    /// The row as output fields, in header column order.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.code.clone(),
            self.name.clone(),
            self.registered.to_string(),
            self.envelopes.to_string(),
            self.valid.to_string(),
        ];
        fields.extend(self.votes.iter().map(|v| v.to_string()));
        fields
    }
}
