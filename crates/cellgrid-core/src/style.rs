//! Style attribute masks and the SGR transition table.
//!
//! Seven toggleable attributes each own one bit of a [`StyleMask`]; bit 0 is
//! reserved. Moving the terminal from one mask to another is reduced to a
//! reset mask and a set mask by [`transition`], and the escape sequence for
//! every `(current, desired)` pair is built once by [`StyleTable::new`].

/// A toggleable text attribute, in canonical declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Bold / increased intensity.
    Bold,
    /// Dim / faint.
    Dim,
    /// Italic.
    Italic,
    /// Underline.
    Underline,
    /// Slow blink.
    Blink,
    /// Swap foreground and background.
    Inverse,
    /// Crossed-out text.
    Strikethrough,
}

impl Attribute {
    /// All attributes in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Bold,
        Self::Dim,
        Self::Italic,
        Self::Underline,
        Self::Blink,
        Self::Inverse,
        Self::Strikethrough,
    ];

    /// The bit this attribute owns in a [`StyleMask`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Bold => 1 << 1,
            Self::Dim => 1 << 2,
            Self::Italic => 1 << 3,
            Self::Underline => 1 << 4,
            Self::Blink => 1 << 5,
            Self::Inverse => 1 << 6,
            Self::Strikethrough => 1 << 7,
        }
    }

    /// SGR parameter that turns the attribute on.
    #[must_use]
    pub const fn sgr_code(self) -> u8 {
        match self {
            Self::Bold => 1,
            Self::Dim => 2,
            Self::Italic => 3,
            Self::Underline => 4,
            Self::Blink => 5,
            Self::Inverse => 7,
            Self::Strikethrough => 9,
        }
    }

    /// SGR parameter that turns the attribute off.
    ///
    /// Bold and Dim share "normal intensity" (22), so resetting either one
    /// clears both on a real terminal.
    #[must_use]
    pub const fn reset_code(self) -> u8 {
        match self {
            Self::Bold | Self::Dim => 22,
            Self::Italic => 23,
            Self::Underline => 24,
            Self::Blink => 25,
            Self::Inverse => 27,
            Self::Strikethrough => 29,
        }
    }
}

/// Packed set of [`Attribute`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleMask(u8);

impl StyleMask {
    /// No attributes.
    pub const NONE: Self = Self(0);
    /// Bold text.
    pub const BOLD: Self = Self(Attribute::Bold.bit());
    /// Dim/faint text.
    pub const DIM: Self = Self(Attribute::Dim.bit());
    /// Italic text.
    pub const ITALIC: Self = Self(Attribute::Italic.bit());
    /// Underlined text.
    pub const UNDERLINE: Self = Self(Attribute::Underline.bit());
    /// Blinking text.
    pub const BLINK: Self = Self(Attribute::Blink.bit());
    /// Reversed colors.
    pub const INVERSE: Self = Self(Attribute::Inverse.bit());
    /// Strikethrough text.
    pub const STRIKETHROUGH: Self = Self(Attribute::Strikethrough.bit());

    /// Bits owned by an attribute (everything but the reserved bit 0).
    pub const ATTRIBUTE_BITS: u8 = 0b1111_1110;

    /// Create empty mask.
    #[must_use]
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Check if no attribute is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 & Self::ATTRIBUTE_BITS == 0
    }

    /// Check if every attribute of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Add attributes.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove attributes.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Get raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Create from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Iterate the set attributes in declaration order (at most seven).
    pub fn attributes(self) -> impl Iterator<Item = Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(move |attr| self.0 & attr.bit() != 0)
    }
}

impl From<Attribute> for StyleMask {
    fn from(attr: Attribute) -> Self {
        Self(attr.bit())
    }
}

impl FromIterator<Attribute> for StyleMask {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, |mask, attr| mask | attr.into())
    }
}

impl std::ops::BitOr for StyleMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for StyleMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for StyleMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// OR together the bits of `attributes`.
#[must_use]
pub fn pack(attributes: &[Attribute]) -> StyleMask {
    attributes.iter().copied().collect()
}

/// Attributes set in `mask`, in declaration order.
pub fn unpack(mask: StyleMask) -> impl Iterator<Item = Attribute> {
    mask.attributes()
}

/// Reduce a style change to `(reset_mask, set_mask)`.
///
/// `reset_mask` holds attributes that are on now and unwanted, `set_mask`
/// the attributes that must be asserted. Clearing `reset_mask` from
/// `current` and then OR-ing `set_mask` yields exactly `desired`.
#[must_use]
pub const fn transition(current: u8, desired: u8) -> (u8, u8) {
    let reset = !desired & current;
    let set = (desired | reset) ^ current;
    (reset, set)
}

const INTENSITY: u8 = Attribute::Bold.bit() | Attribute::Dim.bit();

/// Every style transition sequence, built once.
///
/// Indexed by `(current, desired)` over all 256×256 byte pairs. The table is
/// read-only after construction and can be shared between threads freely.
#[derive(Debug, Clone)]
pub struct StyleTable {
    /// All sequences back to back.
    bytes: Vec<u8>,
    /// `(offset, len)` into `bytes`, at `current * 256 + desired`.
    spans: Vec<(u32, u16)>,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleTable {
    /// Number of `(current, desired)` entries.
    pub const ENTRIES: usize = 256 * 256;

    /// Build the full table.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = Vec::with_capacity(Self::ENTRIES * 12);
        let mut spans = Vec::with_capacity(Self::ENTRIES);

        for current in 0..=u8::MAX {
            for desired in 0..=u8::MAX {
                let start = bytes.len();
                write_transition(&mut bytes, current, desired);
                spans.push((start as u32, (bytes.len() - start) as u16));
            }
        }

        Self { bytes, spans }
    }

    /// Escape sequence moving the terminal from `current` to `desired`.
    ///
    /// Empty when the two masks carry the same attributes.
    #[must_use]
    pub fn sequence(&self, current: StyleMask, desired: StyleMask) -> &[u8] {
        let (offset, len) = self.spans[usize::from(current.0) * 256 + usize::from(desired.0)];
        let start = offset as usize;
        &self.bytes[start..start + usize::from(len)]
    }

    /// Total bytes held by the table.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

fn write_transition(out: &mut Vec<u8>, current: u8, desired: u8) {
    let current = current & StyleMask::ATTRIBUTE_BITS;
    let desired = desired & StyleMask::ATTRIBUTE_BITS;
    let (reset, mut set) = transition(current, desired);
    if reset == 0 && set == 0 {
        return;
    }

    // 22 turns off both intensities; put back whichever is still wanted.
    if reset & INTENSITY != 0 {
        set |= desired & INTENSITY;
    }

    out.extend_from_slice(b"\x1b[");
    let mut first = true;
    let mut last_reset = 0;
    for attr in StyleMask(reset).attributes() {
        let code = attr.reset_code();
        if code == last_reset {
            continue;
        }
        push_code(out, code, &mut first);
        last_reset = code;
    }
    for attr in StyleMask(set).attributes() {
        push_code(out, attr.sgr_code(), &mut first);
    }
    out.push(b'm');
}

fn push_code(out: &mut Vec<u8>, code: u8, first: &mut bool) {
    if !*first {
        out.push(b';');
    }
    *first = false;
    if code >= 10 {
        out.push(b'0' + code / 10);
    }
    out.push(b'0' + code % 10);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_attribute_bits_are_distinct_and_skip_bit_zero() {
        let mut seen = 0u8;
        for attr in Attribute::ALL {
            assert_eq!(attr.bit().count_ones(), 1);
            assert_eq!(seen & attr.bit(), 0);
            seen |= attr.bit();
        }
        assert_eq!(seen, StyleMask::ATTRIBUTE_BITS);
        assert_eq!(seen & 1, 0);
    }

    #[test]
    fn test_sgr_code_tables() {
        let set: Vec<u8> = Attribute::ALL.iter().map(|a| a.sgr_code()).collect();
        assert_eq!(set, vec![1, 2, 3, 4, 5, 7, 9]);
        let reset: Vec<u8> = Attribute::ALL.iter().map(|a| a.reset_code()).collect();
        assert_eq!(reset, vec![22, 22, 23, 24, 25, 27, 29]);
    }

    #[test]
    fn test_pack() {
        let mask = pack(&[Attribute::Bold, Attribute::Underline]);
        assert!(mask.contains(StyleMask::BOLD));
        assert!(mask.contains(StyleMask::UNDERLINE));
        assert!(!mask.contains(StyleMask::ITALIC));
        assert_eq!(pack(&[]), StyleMask::NONE);
    }

    #[test]
    fn test_unpack_is_declaration_ordered() {
        let mask = StyleMask::STRIKETHROUGH | StyleMask::BOLD | StyleMask::BLINK;
        let attrs: Vec<Attribute> = unpack(mask).collect();
        assert_eq!(
            attrs,
            vec![Attribute::Bold, Attribute::Blink, Attribute::Strikethrough]
        );
    }

    #[test]
    fn test_unpack_ignores_reserved_bit() {
        assert_eq!(unpack(StyleMask::from_bits(0b0000_0001)).count(), 0);
        assert!(StyleMask::from_bits(1).is_empty());
        assert_eq!(unpack(StyleMask::from_bits(0xff)).count(), 7);
    }

    #[test]
    fn test_mask_with_without() {
        let m = StyleMask::BOLD.with(StyleMask::ITALIC);
        assert!(m.contains(StyleMask::ITALIC));
        let m2 = m.without(StyleMask::BOLD);
        assert!(!m2.contains(StyleMask::BOLD));
        assert!(m2.contains(StyleMask::ITALIC));
        let mut m3 = StyleMask::NONE;
        m3 |= StyleMask::DIM;
        assert_eq!(m3 & StyleMask::DIM, StyleMask::DIM);
    }

    #[test]
    fn test_transition_masks() {
        let bold = StyleMask::BOLD.bits();
        let italic = StyleMask::ITALIC.bits();
        assert_eq!(transition(0, bold), (0, bold));
        assert_eq!(transition(bold, 0), (bold, 0));
        assert_eq!(transition(bold, italic), (bold, italic));
        assert_eq!(transition(bold | italic, italic), (bold, 0));
    }

    #[test]
    fn test_transition_round_trip_exhaustive() {
        for current in 0..=u8::MAX {
            for desired in 0..=u8::MAX {
                let (reset, set) = transition(current, desired);
                assert_eq!((current & !reset) | set, desired);
            }
        }
    }

    #[test]
    fn test_table_has_every_entry() {
        let table = StyleTable::new();
        assert_eq!(table.spans.len(), StyleTable::ENTRIES);
        assert!(table.byte_len() > 0);
    }

    #[test]
    fn test_table_identity_is_empty() {
        let table = StyleTable::new();
        for bits in 0..=u8::MAX {
            let mask = StyleMask::from_bits(bits);
            assert!(table.sequence(mask, mask).is_empty());
        }
    }

    #[test]
    fn test_table_set_sequence() {
        let table = StyleTable::new();
        let seq = table.sequence(StyleMask::NONE, StyleMask::BOLD | StyleMask::ITALIC);
        assert_eq!(seq, b"\x1b[1;3m");
    }

    #[test]
    fn test_table_reset_sequence() {
        let table = StyleTable::new();
        assert_eq!(table.sequence(StyleMask::BOLD, StyleMask::NONE), b"\x1b[22m");
        assert_eq!(
            table.sequence(StyleMask::UNDERLINE | StyleMask::INVERSE, StyleMask::NONE),
            b"\x1b[24;27m"
        );
    }

    #[test]
    fn test_table_shared_intensity_reset_emitted_once() {
        let table = StyleTable::new();
        assert_eq!(
            table.sequence(StyleMask::BOLD | StyleMask::DIM, StyleMask::NONE),
            b"\x1b[22m"
        );
    }

    #[test]
    fn test_table_reasserts_surviving_intensity() {
        let table = StyleTable::new();
        assert_eq!(
            table.sequence(StyleMask::BOLD | StyleMask::DIM, StyleMask::BOLD),
            b"\x1b[22;1m"
        );
    }

    #[test]
    fn test_table_reset_then_set() {
        let table = StyleTable::new();
        assert_eq!(
            table.sequence(StyleMask::STRIKETHROUGH, StyleMask::BLINK),
            b"\x1b[29;5m"
        );
    }

    proptest! {
        #[test]
        fn prop_pack_unpack_round_trip(bits in any::<u8>()) {
            let mask = StyleMask::from_bits(bits & StyleMask::ATTRIBUTE_BITS);
            let attrs: Vec<Attribute> = unpack(mask).collect();
            prop_assert_eq!(pack(&attrs), mask);
        }

        #[test]
        fn prop_transition_masks_are_disjoint(current in any::<u8>(), desired in any::<u8>()) {
            let (reset, set) = transition(current, desired);
            prop_assert_eq!(reset & desired, 0);
            prop_assert_eq!(set & current, 0);
        }
    }
}
