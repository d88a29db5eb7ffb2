use std::fmt;

/// Elements that take up some number of slots in an `OffsetVec`
pub trait Width {
    fn width(&self) -> usize;
}

/// Vector indexed by slot offsets instead of positions
///
/// Each element takes up as many slots as its `Width`. When decoding class files, this is how the
/// constant pool gets stored: indexing starts at 1 and `long`/`double` entries take up two slots,
/// so a constant index is an offset, not a position.
#[derive(Clone)]
pub struct OffsetVec<T> {
    /// Elements, each tagged with the offset of its first slot
    entries: Vec<(Offset, T)>,

    /// First free slot
    next_offset: Offset,
}

/// Slot offset into an `OffsetVec` or byte offset into a method's code array
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Offset(pub usize);

impl Offset {
    /// Apply a signed relative jump to this offset
    ///
    /// Returns `None` if the result would be negative.
    pub fn jump(self, relative: i32) -> Option<Offset> {
        let target = self.0 as i64 + relative as i64;
        usize::try_from(target).ok().map(Offset)
    }
}

impl<T: Width> OffsetVec<T> {
    pub fn new() -> OffsetVec<T> {
        OffsetVec::new_starting_at(Offset(0))
    }

    /// Empty vector whose first element will be at `first`
    pub fn new_starting_at(first: Offset) -> OffsetVec<T> {
        OffsetVec {
            entries: vec![],
            next_offset: first,
        }
    }

    /// Number of elements (not slots)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset the next pushed element will get
    pub fn offset_len(&self) -> Offset {
        self.next_offset
    }

    /// Append an element, returning its offset
    pub fn push(&mut self, element: T) -> Offset {
        let offset = self.next_offset;
        self.next_offset.0 += element.width();
        self.entries.push((offset, element));
        offset
    }

    /// Look up the element starting at an offset (binary search)
    pub fn get_offset(&self, offset: Offset) -> OffsetResult<T> {
        match self.entries.binary_search_by_key(&offset, |(start, _)| *start) {
            Ok(position) => OffsetResult::Ok(position, &self.entries[position].1),
            Err(position) if position == self.entries.len() => OffsetResult::TooLarge,
            Err(position) => OffsetResult::InvalidOffset(position),
        }
    }
}

impl<T: Width> Default for OffsetVec<T> {
    fn default() -> Self {
        OffsetVec::new()
    }
}

/// Outcome of looking up an offset
pub enum OffsetResult<'a, T> {
    /// Position of the element and the element itself
    Ok(usize, &'a T),

    /// Offset lands inside the element before this position
    ///
    /// For the constant pool, this is the unusable slot following a `long` or `double`.
    InvalidOffset(usize),

    /// Offset is past the last element
    TooLarge,
}

impl<'a, T> OffsetResult<'a, T> {
    pub fn ok(&self) -> Option<&'a T> {
        match self {
            OffsetResult::Ok(_, found) => Some(found),
            OffsetResult::InvalidOffset(_) | OffsetResult::TooLarge => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OffsetVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|(offset, element)| format!("#{} = {:?}", offset.0, element)),
            )
            .finish()
    }
}
