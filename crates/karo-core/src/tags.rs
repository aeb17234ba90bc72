/// Display color of a tag badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagColor {
    Transparent,
    Red,
    Yellow,
    Green,
    Blue,
    Indigo,
    Purple,
    Pink,
}

/// Colors handed out to non-empty tags, in hash order.
pub const PALETTE: [TagColor; 7] = [
    TagColor::Red,
    TagColor::Yellow,
    TagColor::Green,
    TagColor::Blue,
    TagColor::Indigo,
    TagColor::Purple,
    TagColor::Pink,
];

impl TagColor {
    /// Tailwind utility classes for the badge.
    pub fn css_class(self) -> &'static str {
        match self {
            TagColor::Transparent => "bg-transparent",
            TagColor::Red => "bg-red-200 text-red-800",
            TagColor::Yellow => "bg-yellow-200 text-yellow-800",
            TagColor::Green => "bg-green-200 text-green-800",
            TagColor::Blue => "bg-blue-200 text-blue-800",
            TagColor::Indigo => "bg-indigo-200 text-indigo-800",
            TagColor::Purple => "bg-purple-200 text-purple-800",
            TagColor::Pink => "bg-pink-200 text-pink-800",
        }
    }
}

/// Rolling `hash = c + ((hash << 5) - hash)` over UTF-16 code units.
///
/// The shift truncates to 32 bits while the subtraction keeps the full
/// value, matching JavaScript number semantics.
fn tag_hash(tag: &str) -> i64 {
    tag.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit).wrapping_add(shifted.wrapping_sub(hash))
    })
}

pub fn tag_color(tag: &str) -> TagColor {
    if tag.is_empty() {
        return TagColor::Transparent;
    }
    let slot = (tag_hash(tag) % PALETTE.len() as i64).unsigned_abs() as usize;
    PALETTE[slot]
}
