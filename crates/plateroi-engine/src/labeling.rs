//! Deterministic display names for a region list.
//!
//! Names depend only on the partition, never on list order: regions are
//! ranked by their smallest address (unique, since regions are disjoint and
//! non-empty) and the rank feeds a [`RegionLabeler`]. Re-running
//! [`reindex_and_rename_regions`] on an unchanged partition, in any order,
//! produces the same names.
//!
//! The bundled [`TemplateLabeler`] renders names like `SGP1008-run7-R3`
//! from a template with `{run_name}`, `{work_number}`, `{index}` and
//! `{first}` placeholders.

use std::collections::BTreeSet;
use std::fmt;

use plateroi_core::Region;

/// Page context threaded into names: run name and work-order identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingContext {
    pub run_name: String,
    pub work_number: String,
}

impl NamingContext {
    #[must_use]
    pub fn new(run_name: impl Into<String>, work_number: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            work_number: work_number.into(),
        }
    }
}

/// Produces the display name for one region.
///
/// `rank` is the region's 1-based position in canonical (smallest address)
/// order. Implementations must return distinct names for distinct ranks.
pub trait RegionLabeler {
    fn label(&self, rank: usize, region: &Region, context: &NamingContext) -> String;
}

impl<F> RegionLabeler for F
where
    F: Fn(usize, &Region, &NamingContext) -> String,
{
    fn label(&self, rank: usize, region: &Region, context: &NamingContext) -> String {
        self(rank, region, context)
    }
}

/// Rename every region by canonical rank. Order, groups and colors are kept.
///
/// If a labeler yields a name already taken, the later region gets a
/// `~rank` suffix, then `~rank~2`, `~rank~3`, ... until the name is free.
#[must_use]
pub fn reindex_and_rename_regions(
    regions: Vec<Region>,
    context: &NamingContext,
    labeler: &dyn RegionLabeler,
) -> Vec<Region> {
    let mut order: Vec<usize> = (0..regions.len()).collect();
    order.sort_by_key(|&i| regions[i].first_address());

    let mut ranks = vec![0usize; regions.len()];
    for (rank, &index) in order.iter().enumerate() {
        ranks[index] = rank + 1;
    }

    let mut names: Vec<String> = vec![String::new(); regions.len()];
    let mut seen = BTreeSet::new();
    // Assign in canonical order so collision suffixes are order-independent.
    for &index in &order {
        let rank = ranks[index];
        let mut name = labeler.label(rank, &regions[index], context);
        if seen.contains(&name) {
            tracing::warn!(rank, name = %name, "labeler produced a duplicate name");
            let base = format!("{name}~{rank}");
            name = base.clone();
            let mut attempt = 2;
            while seen.contains(&name) {
                name = format!("{base}~{attempt}");
                attempt += 1;
            }
        }
        seen.insert(name.clone());
        names[index] = name;
    }

    regions
        .into_iter()
        .zip(names)
        .map(|(region, name)| region.with_name(name))
        .collect()
}

// ---------------------------------------------------------------------------
// Template labeler
// ---------------------------------------------------------------------------

/// Default name template.
pub const DEFAULT_TEMPLATE: &str = "{work_number}-{run_name}-R{index}";

const SEPARATORS: &[char] = &['-', '_', '.', ' ', '/', ':'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    RunName,
    WorkNumber,
    Index,
    First,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "run_name" => Some(Self::RunName),
            "work_number" => Some(Self::WorkNumber),
            "index" => Some(Self::Index),
            "first" => Some(Self::First),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// Problems with a name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    Empty,
    Unclosed { offset: usize },
    UnknownPlaceholder { name: String },
    /// Neither `{index}` nor `{first}` appears, so names would collide.
    NotUnique,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name template is empty"),
            Self::Unclosed { offset } => {
                write!(f, "unclosed '{{' at offset {offset} in name template")
            }
            Self::UnknownPlaceholder { name } => {
                write!(f, "unknown placeholder '{{{name}}}' in name template")
            }
            Self::NotUnique => write!(
                f,
                "name template must contain {{index}} or {{first}} to keep names unique"
            ),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Renders region names from a placeholder template.
///
/// Empty context values are dropped together with one adjacent separator,
/// so a missing run name turns `W1-{run_name}-R1` into `W1-R1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLabeler {
    segments: Vec<Segment>,
    index_width: usize,
}

impl Default for TemplateLabeler {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, 0).unwrap_or_else(|_| unreachable!("default template parses"))
    }
}

impl TemplateLabeler {
    /// Parse `template`; `index_width` zero-pads `{index}` (0 = no padding).
    pub fn new(template: &str, index_width: usize) -> Result<Self, TemplateError> {
        if template.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;
        let mut offset = 0;
        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or(TemplateError::Unclosed {
                offset: offset + open,
            })?;
            let name = &after[..close];
            let field = Placeholder::parse(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
                name: name.to_string(),
            })?;
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));
            let consumed = open + 1 + close + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let unique = segments.iter().any(|s| {
            matches!(
                s,
                Segment::Field(Placeholder::Index) | Segment::Field(Placeholder::First)
            )
        });
        if !unique {
            return Err(TemplateError::NotUnique);
        }

        Ok(Self {
            segments,
            index_width,
        })
    }

    fn render_field(&self, field: Placeholder, rank: usize, region: &Region, ctx: &NamingContext) -> String {
        match field {
            Placeholder::RunName => ctx.run_name.trim().to_string(),
            Placeholder::WorkNumber => ctx.work_number.trim().to_string(),
            Placeholder::Index => format!("{rank:0width$}", width = self.index_width),
            Placeholder::First => region.first_address().to_string(),
        }
    }
}

impl RegionLabeler for TemplateLabeler {
    fn label(&self, rank: usize, region: &Region, context: &NamingContext) -> String {
        let mut pieces: Vec<String> = Vec::with_capacity(self.segments.len());
        let mut drop_next_separator = false;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    let text = if drop_next_separator {
                        text.strip_prefix(SEPARATORS).unwrap_or(text)
                    } else {
                        text.as_str()
                    };
                    drop_next_separator = false;
                    pieces.push(text.to_string());
                }
                Segment::Field(field) => {
                    let value = self.render_field(*field, rank, region, context);
                    if value.is_empty() {
                        drop_next_separator = true;
                    } else {
                        drop_next_separator = false;
                        pieces.push(value);
                    }
                }
            }
        }

        // Trailing empty field: eat the separator before it instead.
        if drop_next_separator {
            if let Some(last) = pieces.last_mut() {
                if let Some(stripped) = last.strip_suffix(SEPARATORS) {
                    *last = stripped.to_string();
                }
            }
        }

        pieces.concat()
    }
}
