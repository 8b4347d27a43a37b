use std::fmt;

use nalgebra::Vector3;

use crate::error::RasterError;

/// Kind of data stored in a resource slot. Used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Positions,
    Indices,
    Colors,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferKind::Positions => "position",
            BufferKind::Indices => "index",
            BufferKind::Colors => "color",
        };
        return write!(f, "{}", name);
    }
}

/// Handle of an uploaded position buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PosBufId(usize);

/// Handle of an uploaded index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndBufId(usize);

/// Handle of an uploaded color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColBufId(usize);

impl PosBufId {
    pub fn id(self) -> usize {
        return self.0;
    }
}

impl IndBufId {
    pub fn id(self) -> usize {
        return self.0;
    }
}

impl ColBufId {
    pub fn id(self) -> usize {
        return self.0;
    }
}

enum Slot {
    Positions(Vec<Vector3<f32>>),
    Indices(Vec<Vector3<usize>>),
    Colors(Vec<Vector3<f32>>),
}

/// Arena of uploaded vertex data.
///
/// All three kinds share one id sequence, so a handle is simply the position of its slot.
/// Slots are never removed, which keeps every handle valid for the lifetime of the table.
#[derive(Default)]
pub struct Resources {
    slots: Vec<Slot>,
}

impl Resources {
    pub fn new() -> Self {
        return Self::default();
    }

    fn push(&mut self, slot: Slot) -> usize {
        let id = self.slots.len();
        self.slots.push(slot);
        return id;
    }

    pub fn upload_positions(&mut self, positions: &[Vector3<f32>]) -> PosBufId {
        return PosBufId(self.push(Slot::Positions(positions.to_vec())));
    }

    pub fn upload_indices(&mut self, indices: &[Vector3<usize>]) -> IndBufId {
        return IndBufId(self.push(Slot::Indices(indices.to_vec())));
    }

    pub fn upload_colors(&mut self, colors: &[Vector3<f32>]) -> ColBufId {
        return ColBufId(self.push(Slot::Colors(colors.to_vec())));
    }

    pub fn positions(&self, id: PosBufId) -> Result<&[Vector3<f32>], RasterError> {
        match self.slots.get(id.0) {
            Some(Slot::Positions(positions)) => Ok(positions),
            _ => Err(RasterError::InvalidHandle { kind: BufferKind::Positions, id: id.0 }),
        }
    }

    pub fn indices(&self, id: IndBufId) -> Result<&[Vector3<usize>], RasterError> {
        match self.slots.get(id.0) {
            Some(Slot::Indices(indices)) => Ok(indices),
            _ => Err(RasterError::InvalidHandle { kind: BufferKind::Indices, id: id.0 }),
        }
    }

    pub fn colors(&self, id: ColBufId) -> Result<&[Vector3<f32>], RasterError> {
        match self.slots.get(id.0) {
            Some(Slot::Colors(colors)) => Ok(colors),
            _ => Err(RasterError::InvalidHandle { kind: BufferKind::Colors, id: id.0 }),
        }
    }

    /// Number of slots handed out so far.
    pub fn len(&self) -> usize {
        return self.slots.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.slots.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn handles_are_sequential_across_kinds() {
        let mut resources = Resources::new();
        let pos = resources.upload_positions(&[vector![0.0, 0.0, 0.0]]);
        let ind = resources.upload_indices(&[vector![0, 0, 0]]);
        let col = resources.upload_colors(&[vector![1.0, 0.0, 0.0]]);
        assert_eq!(pos.id(), 0);
        assert_eq!(ind.id(), 1);
        assert_eq!(col.id(), 2);
        assert_eq!(resources.len(), 3);
    }

    #[test]
    fn upload_copies_input() {
        let mut resources = Resources::new();
        let mut input = vec![vector![1.0, 2.0, 3.0]];
        let pos = resources.upload_positions(&input);
        input[0].x = 42.0;
        assert_eq!(resources.positions(pos).unwrap()[0], vector![1.0, 2.0, 3.0]);
    }

    #[test]
    fn lookup_of_wrong_kind_is_rejected() {
        let mut resources = Resources::new();
        let col = resources.upload_colors(&[vector![1.0, 1.0, 1.0]]);
        let err = resources.positions(PosBufId(col.id())).unwrap_err();
        assert_eq!(err, RasterError::InvalidHandle { kind: BufferKind::Positions, id: 0 });
    }

    #[test]
    fn lookup_of_unknown_handle_is_rejected() {
        let resources = Resources::new();
        let err = resources.indices(IndBufId(7)).unwrap_err();
        assert_eq!(err, RasterError::InvalidHandle { kind: BufferKind::Indices, id: 7 });
    }
}
