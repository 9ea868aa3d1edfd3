use serde::{Deserialize, Serialize};

pub const DEFAULT_GROUP: &str = "default";
pub const DEFAULT_GROUP_COLOR: &str = "#00FF7F";

// ── Rectangles ──────────────────────────────────────────────────────────────

/// A named sprite region in atlas pixel space.
///
/// Rects have no stable id: a rect is addressed by its index in the session's
/// rect list, so deleting or replacing rects renumbers the ones after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_group")]
    pub group: String,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            w,
            h,
            name: name.into(),
            group: default_group(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Exclusive right edge. Widened so `x + w` cannot overflow.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.h)
    }

    /// Half-open containment test: the right and bottom edges are outside.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let (x, y) = (u64::from(x), u64::from(y));
        x >= u64::from(self.x) && x < self.right() && y >= u64::from(self.y) && y < self.bottom()
    }

    /// Applies every field the patch carries, leaving the rest untouched.
    pub fn merge(&mut self, patch: &RectPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.w {
            self.w = w;
        }
        if let Some(h) = patch.h {
            self.h = h;
        }
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref group) = patch.group {
            self.group = if group.is_empty() {
                default_group()
            } else {
                group.clone()
            };
        }
    }
}

/// Partial update for a [`Rect`]; `None` fields are left as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RectPatch {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub name: Option<String>,
    pub group: Option<String>,
}

impl RectPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..Default::default()
        }
    }

    pub fn bounds(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            w: Some(w),
            h: Some(h),
            ..Default::default()
        }
    }
}

// ── Groups ──────────────────────────────────────────────────────────────────

/// Deterministic `#RRGGBB` color for a group name.
///
/// Runs the classic `hash * 31 + unit` string hash over UTF-16 code units in
/// wrapping 32-bit arithmetic and keeps the low 24 bits, so colors match
/// across sessions and runs.
pub fn generate_color(name: &str) -> String {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    format!("#{:06X}", hash & 0x00FF_FFFF)
}

/// Group name to color table, in insertion order.
///
/// The `default` group is always present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupTable {
    entries: Vec<(String, String)>,
}

impl Default for GroupTable {
    fn default() -> Self {
        Self {
            entries: vec![(DEFAULT_GROUP.to_string(), DEFAULT_GROUP_COLOR.to_string())],
        }
    }
}

impl GroupTable {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    /// Inserts `name` with its generated color. Returns `false` when the name
    /// is empty or already registered.
    pub fn register(&mut self, name: &str) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), generate_color(name)));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }
}

/// Parses `#RRGGBB` into RGB bytes.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_colors_match_the_reference_hash() {
        assert_eq!(generate_color(""), "#000000");
        assert_eq!(generate_color("a"), "#000061");
        assert_eq!(generate_color("ab"), "#000C21");
    }

    #[test]
    fn generated_colors_are_stable_and_distinct() {
        assert_eq!(generate_color("enemies"), generate_color("enemies"));
        assert_ne!(generate_color("enemies"), generate_color("items"));
        let long = "a_rather_long_group_name_that_overflows_the_hash";
        let color = generate_color(long);
        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
        assert!(parse_hex_color(&color).is_some());
    }

    #[test]
    fn merge_only_touches_given_fields() {
        let mut rect = Rect::new(1, 2, 3, 4, "hero");
        rect.merge(&RectPatch {
            w: Some(30),
            group: Some("players".into()),
            ..Default::default()
        });
        assert_eq!(rect, Rect::new(1, 2, 30, 4, "hero").with_group("players"));

        rect.merge(&RectPatch::group(""));
        assert_eq!(rect.group, DEFAULT_GROUP);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(2, 2, 2, 2, "");
        assert!(rect.contains(2, 2));
        assert!(rect.contains(3, 3));
        assert!(!rect.contains(4, 3));
        assert!(!rect.contains(1, 2));
    }

    #[test]
    fn edges_do_not_overflow_at_u32_extremes() {
        let rect = Rect::new(4_000_000_000, u32::MAX, 400_000_000, u32::MAX, "far");
        assert_eq!(rect.right(), 4_400_000_000);
        assert_eq!(rect.bottom(), 2 * u64::from(u32::MAX));
        assert!(rect.contains(u32::MAX, u32::MAX));
        assert!(!rect.contains(3_999_999_999, u32::MAX));
    }

    #[test]
    fn group_table_keeps_default_and_order() {
        let mut groups = GroupTable::default();
        assert_eq!(groups.color(DEFAULT_GROUP), Some(DEFAULT_GROUP_COLOR));
        assert!(groups.register("b"));
        assert!(groups.register("a"));
        assert!(!groups.register("a"));
        assert!(!groups.register(""));
        let names: Vec<&str> = groups.names().collect();
        assert_eq!(names, vec![DEFAULT_GROUP, "b", "a"]);
        assert_eq!(groups.color("a"), Some(generate_color("a").as_str()));
    }

    #[test]
    fn rect_group_defaults_when_missing_from_json() {
        let rect: Rect = serde_json::from_str(r#"{"x":1,"y":2,"w":3,"h":4}"#).unwrap();
        assert_eq!(rect.group, DEFAULT_GROUP);
        assert!(rect.name.is_empty());
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#00FF7F"), Some([0, 255, 127]));
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }
}
