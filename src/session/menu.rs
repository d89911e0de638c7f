use crate::document::{BlockId, BlockType};

/// Block-type menu state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Idle,
    /// Menu visible below `anchor`, with `selected` indexing [`BlockType::ALL`].
    Open { anchor: BlockId, selected: usize },
}

impl MenuState {
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub const fn anchor(&self) -> Option<BlockId> {
        match self {
            Self::Open { anchor, .. } => Some(*anchor),
            Self::Idle => None,
        }
    }

    /// Type currently highlighted in the menu.
    pub fn highlighted(&self) -> Option<BlockType> {
        match self {
            Self::Open { selected, .. } => BlockType::ALL.get(*selected).copied(),
            Self::Idle => None,
        }
    }

    /// Move the highlight by `delta`, wrapping around.
    pub(super) fn step(&mut self, delta: isize) {
        if let Self::Open { selected, .. } = self {
            let len = BlockType::ALL.len();
            let step = delta.unsigned_abs() % len;
            *selected = if delta >= 0 {
                (*selected + step) % len
            } else {
                (*selected + len - step) % len
            };
        }
    }
}
