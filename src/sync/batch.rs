/// Destination identifiers waiting to be submitted together.
///
/// Never holds more than `capacity` ids: the push that fills it hands the
/// whole batch back for submission and leaves it empty.
#[derive(Debug)]
pub struct Batch {
    capacity: usize,
    ids: Vec<String>,
}

impl Batch {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Batch {
            capacity,
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Appends `id`; returns the drained batch when it reached capacity.
    pub fn push(&mut self, id: String) -> Option<Vec<String>> {
        self.ids.push(id);
        if self.ids.len() >= self.capacity {
            Some(self.take())
        } else {
            None
        }
    }

    /// Empties the batch, returning its ids in insertion order.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::replace(&mut self.ids, Vec::with_capacity(self.capacity))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_exactly_at_capacity() {
        let mut batch = Batch::new(2);
        assert!(batch.push("a".into()).is_none());
        assert_eq!(batch.push("b".into()), Some(vec!["a".to_string(), "b".to_string()]));
        assert!(batch.is_empty());
        assert!(batch.push("c".into()).is_none());
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut batch = Batch::new(0);
        assert_eq!(batch.capacity(), 1);
        assert_eq!(batch.push("a".into()), Some(vec!["a".to_string()]));
    }
}
