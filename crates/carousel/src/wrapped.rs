/// Real items framed by two phantom duplicates: the last real item at index
/// 0 and the first real item at `len() - 1`. Scrolling onto a phantom looks
/// identical to wrapping around, which the selector then makes real.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedList<T> {
    items: Vec<T>,
}

impl<T> Default for WrappedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone> WrappedList<T> {
    pub fn new(real: Vec<T>) -> Self {
        let (Some(first), Some(last)) = (real.first().cloned(), real.last().cloned()) else {
            return Self::default();
        };

        let mut items = Vec::with_capacity(real.len() + 2);
        items.push(last);
        items.extend(real);
        items.push(first);
        Self { items }
    }
}

impl<T> WrappedList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn real_len(&self) -> usize {
        self.items.len().saturating_sub(2)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn is_phantom(&self, index: usize) -> bool {
        !self.is_empty() && (index == 0 || index == self.len() - 1)
    }

    /// Position in the real list, phantoms resolved to the item they alias.
    pub fn real_index(&self, index: usize) -> Option<usize> {
        let n = self.real_len();
        match index {
            _ if self.is_empty() || index >= self.len() => None,
            0 => Some(n - 1),
            i if i == n + 1 => Some(0),
            i => Some(i - 1),
        }
    }
}
