/// Trailing-edge timer: every `schedule` pushes the deadline out again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per schedule burst, when the deadline has passed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_collapse_into_one_fire() {
        let mut debouncer = Debouncer::new(150.0);
        debouncer.schedule(0.0);
        debouncer.schedule(100.0);
        assert!(!debouncer.poll(200.0));
        assert!(debouncer.poll(250.0));
        assert!(!debouncer.poll(400.0));
    }

    #[test]
    fn cancel_drops_pending_fire() {
        let mut debouncer = Debouncer::new(150.0);
        debouncer.schedule(0.0);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(1000.0));
    }
}
