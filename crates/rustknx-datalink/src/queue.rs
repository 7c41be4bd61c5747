use rustknx_core::Priority;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Weighted round-robin send queue with one FIFO lane per [`Priority`].
///
/// The distribution table assigns each priority rank a credit: a negative
/// credit means the rank is always served when non-empty, a positive credit
/// is the number of consecutive services the rank gets before yielding one
/// turn to the ranks below it. With the default distribution `[-1, 3, 2, 1]`
/// a saturated queue interleaves three urgent frames per normal frame and
/// three normal rounds per low frame, while system frames always preempt.
pub struct PriorityQueue<T> {
    inner: Mutex<Inner<T>>,
    available: Condvar,
    distribution: [i8; 4],
}

struct Inner<T> {
    lanes: [VecDeque<T>; 4],
    credits: [i8; 4],
}

impl<T> PriorityQueue<T> {
    pub fn new(distribution: [i8; 4]) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lanes: Default::default(),
                credits: distribution,
            }),
            available: Condvar::new(),
            distribution,
        }
    }

    /// Appends `item` to the lane for `priority` and wakes one waiter.
    pub fn push(&self, item: T, priority: Priority) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.lanes[priority.rank()].push_back(item);
        self.available.notify_one();
    }

    /// Removes the next item per the weighted round-robin schedule, or
    /// returns `None` immediately when all lanes are empty.
    pub fn try_pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.pop_locked(&mut inner)
    }

    /// Like [`try_pop`](Self::try_pop) but blocks up to `timeout` for an
    /// item to arrive.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(item) = self.pop_locked(&mut inner) {
                return Some(item);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, wait) = self
                .available
                .wait_timeout(inner, remaining)
                .unwrap_or_else(|e| e.into_inner());
            inner = guard;
            if wait.timed_out() {
                return self.pop_locked(&mut inner);
            }
        }
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.lanes.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pop_locked(&self, inner: &mut Inner<T>) -> Option<T> {
        // First scan honors credits: an exhausted rank recharges and yields
        // one turn to the ranks below it.
        for rank in 0..4 {
            if inner.lanes[rank].is_empty() {
                continue;
            }
            if self.distribution[rank] < 0 {
                return inner.lanes[rank].pop_front();
            }
            if inner.credits[rank] > 0 {
                inner.credits[rank] -= 1;
                return inner.lanes[rank].pop_front();
            }
            inner.credits[rank] = self.distribution[rank];
        }
        // Second scan guarantees progress when every non-empty rank yielded.
        for rank in 0..4 {
            if let Some(item) = inner.lanes[rank].pop_front() {
                if inner.credits[rank] > 0 {
                    inner.credits[rank] -= 1;
                }
                return Some(item);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::PriorityQueue;
    use rustknx_core::Priority;
    use std::sync::Arc;
    use std::time::Duration;

    const DISTRIBUTION: [i8; 4] = [-1, 3, 2, 1];

    #[test]
    fn fifo_within_a_priority() {
        let q = PriorityQueue::new(DISTRIBUTION);
        for n in 0..5 {
            q.push(n, Priority::Low);
        }
        for n in 0..5 {
            assert_eq!(q.try_pop(), Some(n));
        }
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn system_always_preempts() {
        let q = PriorityQueue::new(DISTRIBUTION);
        for n in 0..10 {
            q.push(('u', n), Priority::Urgent);
            q.push(('s', n), Priority::System);
        }
        for n in 0..10 {
            assert_eq!(q.try_pop(), Some(('s', n)));
        }
        assert_eq!(q.try_pop(), Some(('u', 0)));
    }

    #[test]
    fn weighted_interleave_under_saturation() {
        let q = PriorityQueue::new(DISTRIBUTION);
        for n in 0..9 {
            q.push(('U', n), Priority::Urgent);
        }
        for n in 0..2 {
            q.push(('N', n), Priority::Normal);
        }
        q.push(('L', 0), Priority::Low);
        let order: String = std::iter::from_fn(|| q.try_pop())
            .map(|(tag, _)| tag)
            .collect();
        assert_eq!(order, "UUUNUUUNUUUL");
    }

    #[test]
    fn lower_priorities_drain_when_alone() {
        let q = PriorityQueue::new(DISTRIBUTION);
        for n in 0..7 {
            q.push(n, Priority::Normal);
        }
        // The rank recharges every third pop but must still be served.
        for n in 0..7 {
            assert_eq!(q.try_pop(), Some(n));
        }
    }

    #[test]
    fn pop_timeout_wakes_on_push() {
        let q = Arc::new(PriorityQueue::new(DISTRIBUTION));
        let producer = {
            let q = Arc::clone(&q);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(30));
                q.push(42, Priority::Normal);
            })
        };
        assert_eq!(q.pop_timeout(Duration::from_secs(5)), Some(42));
        producer.join().unwrap();
    }

    #[test]
    fn pop_timeout_expires_when_empty() {
        let q: PriorityQueue<u8> = PriorityQueue::new(DISTRIBUTION);
        assert_eq!(q.pop_timeout(Duration::from_millis(10)), None);
    }
}
