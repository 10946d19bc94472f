use rand::seq::SliceRandom;

use super::Advance;

/// A shuffled permutation of queue indices and a position inside it.
///
/// `next` past the last slot draws a new permutation; `prev` before the
/// first slot wraps to the last one of the same permutation.
#[derive(Debug, Clone)]
pub struct RandomCursor {
    order: Vec<usize>,
    pos: Option<usize>,
}

impl RandomCursor {
    pub fn new(len: usize) -> Self {
        Self {
            order: shuffled(len),
            pos: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_order(order: Vec<usize>) -> Self {
        Self { order, pos: None }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn position(&self) -> Option<usize> {
        self.pos
    }

    /// Move to the slot holding `index`. Unknown indices leave the cursor
    /// before the first slot.
    pub fn sync_to(&mut self, index: usize) {
        self.pos = self.order.iter().position(|&i| i == index);
    }

    pub(super) fn next(&mut self) -> Advance {
        let (pos, reshuffled) = match self.pos {
            None => (0, false),
            Some(p) if p + 1 < self.order.len() => (p + 1, false),
            Some(_) => {
                self.order = shuffled(self.order.len());
                (0, true)
            }
        };
        self.pos = Some(pos);
        Advance {
            index: self.order[pos],
            wrapped: reshuffled,
            reshuffled,
        }
    }

    pub(super) fn prev(&mut self) -> Advance {
        let last = self.order.len() - 1;
        let (pos, wrapped) = match self.pos {
            None | Some(0) => (last, true),
            Some(p) => (p - 1, false),
        };
        self.pos = Some(pos);
        Advance {
            index: self.order[pos],
            wrapped,
            reshuffled: false,
        }
    }
}

fn shuffled(len: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut rand::rng());
    order
}
