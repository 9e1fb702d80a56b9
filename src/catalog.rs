//! Read-only chip catalog
//!
//! Built once by the session layer and passed by reference to whatever
//! needs to resolve chip ids. Lookups hand out copies.

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{HALF_COLS, STAGE_ROWS};
use crate::error::{Error, Result};
use crate::sim::{AreaPattern, Chip, Folder};

/// Parse a `|`-separated 3x3 glyph grid (`#` threatened, `.` safe)
const fn glyphs(s: &str) -> AreaPattern {
    let bytes = s.as_bytes();
    let mut cells = [[false; 3]; 3];
    let (mut i, mut row, mut col) = (0, 0, 0);
    while i < bytes.len() {
        if bytes[i] == b'|' {
            row += 1;
            col = 0;
        } else {
            cells[row][col] = bytes[i] == b'#';
            col += 1;
        }
        i += 1;
    }
    AreaPattern::new(cells)
}

/// Chips shipped with the game, ids in table order
const STANDARD_CHIPS: &[(&str, AreaPattern)] = &[
    ("Front Column", glyphs("#..|#..|#..")),
    ("Middle Column", glyphs(".#.|.#.|.#.")),
    ("Back Column", glyphs("..#|..#|..#")),
    ("Top Row", glyphs("###|...|...")),
    ("Center Row", glyphs("...|###|...")),
    ("Bottom Row", glyphs("...|...|###")),
    ("Cross", glyphs(".#.|###|.#.")),
    ("X Strike", glyphs("#.#|.#.|#.#")),
    ("Diagonal", glyphs("#..|.#.|..#")),
    ("Anti Diagonal", glyphs("..#|.#.|#..")),
    ("Front Wedge", glyphs("#..|##.|#..")),
    ("Back Wedge", glyphs("..#|.##|..#")),
    ("Corners", glyphs("#.#|...|#.#")),
    ("Ring", glyphs("###|#.#|###")),
    ("Core", glyphs("...|.#.|...")),
    ("Upper Box", glyphs("##.|##.|...")),
    ("Lower Box", glyphs("...|.##|.##")),
    ("Diamond", glyphs(".#.|#.#|.#.")),
    ("Hook", glyphs("###|..#|...")),
    ("Anchor", glyphs("#..|#..|###")),
    ("Zigzag", glyphs("#..|.#.|#..")),
    ("Front Block", glyphs("##.|##.|##.")),
    ("Back Block", glyphs(".##|.##|.##")),
    ("Meteor", glyphs("###|###|###")),
];

/// One chip as stored in a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogEntry {
    id: u32,
    name: String,
    pattern: Vec<Vec<bool>>,
}

/// Validate an entry's grid, naming the first row that is the wrong size
fn parse_pattern(entry: &CatalogEntry) -> Result<AreaPattern> {
    let malformed = Error::MalformedPattern {
        id: entry.id,
        rows: entry.pattern.len(),
    };
    if entry.pattern.len() != STAGE_ROWS {
        return Err(malformed);
    }
    if let Some((row, cells)) = entry
        .pattern
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != HALF_COLS)
    {
        return Err(Error::MalformedRow {
            id: entry.id,
            row,
            len: cells.len(),
        });
    }
    AreaPattern::from_rows(&entry.pattern).ok_or(malformed)
}

/// Every chip the game knows, keyed by id
#[derive(Debug, Clone, Default)]
pub struct ChipCatalog {
    chips: BTreeMap<u32, Chip>,
}

impl ChipCatalog {
    /// The built-in chip set
    pub fn standard() -> Self {
        let chips = STANDARD_CHIPS
            .iter()
            .enumerate()
            .map(|(id, (name, pattern))| (id as u32, Chip::new(id as u32, *name, *pattern)))
            .collect();
        Self { chips }
    }

    /// Catalog over an explicit chip list; later duplicates replace earlier ones
    pub fn from_chips(chips: impl IntoIterator<Item = Chip>) -> Self {
        Self {
            chips: chips.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Parse a JSON array of `{ "id", "name", "pattern" }` entries
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        let mut chips = BTreeMap::new();
        for entry in entries {
            let pattern = parse_pattern(&entry)?;
            if chips.contains_key(&entry.id) {
                return Err(Error::DuplicateChip(entry.id));
            }
            chips.insert(entry.id, Chip::new(entry.id, entry.name, pattern));
        }
        log::info!("Loaded {} chips", chips.len());
        Ok(Self { chips })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Copy of the chip with `id`
    pub fn chip(&self, id: u32) -> Result<Chip> {
        self.chips.get(&id).cloned().ok_or(Error::UnknownChip(id))
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.chips.keys().copied()
    }

    /// Folder of up to `size` distinct chips chosen at random
    pub fn random_folder<R: Rng + ?Sized>(&self, rng: &mut R, size: usize) -> Folder {
        let all: Vec<&Chip> = self.chips.values().collect();
        let amount = size.min(all.len());
        let chips = rand::seq::index::sample(rng, all.len(), amount)
            .into_iter()
            .map(|i| all[i].clone())
            .collect();
        Folder::new(chips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_glyphs() {
        let p = glyphs("#..|.#.|..#");
        assert!(p.get(0, 0) && p.get(1, 1) && p.get(2, 2));
        assert_eq!(p.threatened_cells().count(), 3);
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = ChipCatalog::standard();
        assert_eq!(catalog.len(), STANDARD_CHIPS.len());
        let chip = catalog.chip(6).unwrap();
        assert_eq!(chip.name, "Cross");
        assert!(matches!(catalog.chip(999), Err(Error::UnknownChip(999))));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "id": 3, "name": "Spike", "pattern": [[true, false, false], [false, false, false], [false, false, false]] }
        ]"#;
        let catalog = ChipCatalog::from_json(json).unwrap();
        assert!(catalog.chip(3).unwrap().pattern().get(0, 0));
    }

    #[test]
    fn test_from_json_rejects_bad_data() {
        let short = r#"[{ "id": 1, "name": "x", "pattern": [[true, true, true]] }]"#;
        assert!(matches!(
            ChipCatalog::from_json(short),
            Err(Error::MalformedPattern { id: 1, rows: 1 })
        ));

        let ragged = r#"[{ "id": 2, "name": "y", "pattern": [[true, true, true], [true], [true, true, true]] }]"#;
        let err = ChipCatalog::from_json(ragged).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { id: 2, row: 1, len: 1 }));
        assert!(err.to_string().contains("row 1 has 1 cells"));

        let row = "[false, false, false]";
        let dup = format!(
            r#"[{{ "id": 1, "name": "a", "pattern": [{row}, {row}, {row}] }},
                {{ "id": 1, "name": "b", "pattern": [{row}, {row}, {row}] }}]"#
        );
        assert!(matches!(ChipCatalog::from_json(&dup), Err(Error::DuplicateChip(1))));

        assert!(matches!(ChipCatalog::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_random_folder_distinct() {
        let catalog = ChipCatalog::standard();
        let folder = catalog.random_folder(&mut Pcg32::seed_from_u64(5), 15);
        let mut ids = folder.ids();
        assert_eq!(ids.len(), 15);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);

        let again = catalog.random_folder(&mut Pcg32::seed_from_u64(5), 15);
        assert_eq!(folder.ids(), again.ids());
    }

    #[test]
    fn test_folder_from_ids() {
        let catalog = ChipCatalog::standard();
        let folder = Folder::from_ids(&catalog, &[0, 6, 6]).unwrap();
        assert_eq!(folder.ids(), vec![0, 6, 6]);
        assert!(Folder::from_ids(&catalog, &[0, 500]).is_err());
    }
}
