/// One message in a run's output stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Message<P> {
    Chunk { payload: P, progress: f64 },
    Complete { payload: Option<P> },
}

impl<P> Message<P> {
    pub fn progress(&self) -> f64 {
        match self {
            Message::Chunk { progress, .. } => *progress,
            Message::Complete { .. } => 1.0,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Message::Complete { .. })
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            Message::Chunk { payload, .. } => Some(payload),
            Message::Complete { payload } => payload.as_ref(),
        }
    }

    pub fn into_payload(self) -> Option<P> {
        match self {
            Message::Chunk { payload, .. } => Some(payload),
            Message::Complete { payload } => payload,
        }
    }
}

/// A domain split into chunks that are computed one at a time, on demand.
pub trait ChunkSource {
    type Payload;

    /// Computes the next chunk and its completed fraction, or `None` once the domain is exhausted.
    fn next_chunk(&mut self) -> Option<(Self::Payload, f64)>;

    /// Payload attached to the terminal `Complete` message.
    fn finish(&mut self) -> Option<Self::Payload> {
        None
    }
}

/// Drives a `ChunkSource` as an iterator: every chunk in order, then exactly one `Complete`.
///
/// Progress handed out is clamped to [0, 1] and never decreases within a run.
pub struct Chunked<S: ChunkSource> {
    source: S,
    progress: f64,
    emitted: usize,
    done: bool,
}

impl<S: ChunkSource> Chunked<S> {
    pub fn new(source: S) -> Self {
        Chunked { source, progress: 0.0, emitted: 0, done: false }
    }
}

impl<S: ChunkSource> Iterator for Chunked<S> {
    type Item = Message<S::Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.source.next_chunk() {
            Some((payload, progress)) => {
                self.progress = progress.clamp(0.0, 1.0).max(self.progress);
                self.emitted += 1;
                log::debug!("chunk {} at {:.1}%", self.emitted, self.progress * 100.0);
                Some(Message::Chunk { payload, progress: self.progress })
            }
            None => {
                self.done = true;
                log::debug!("run complete after {} chunks", self.emitted);
                Some(Message::Complete { payload: self.source.finish() })
            }
        }
    }
}

impl<S: ChunkSource> std::iter::FusedIterator for Chunked<S> {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        left: u32,
        total: u32,
    }

    impl ChunkSource for Countdown {
        type Payload = u32;

        fn next_chunk(&mut self) -> Option<(u32, f64)> {
            if self.left == 0 {
                return None;
            }
            self.left -= 1;
            let done = self.total - self.left;
            Some((done, done as f64 / self.total as f64))
        }
    }

    struct Jittery(Vec<f64>);

    impl ChunkSource for Jittery {
        type Payload = ();

        fn next_chunk(&mut self) -> Option<((), f64)> {
            if self.0.is_empty() { None } else { Some(((), self.0.remove(0))) }
        }
    }

    #[test]
    fn emits_chunks_then_one_complete() {
        let messages: Vec<_> = Chunked::new(Countdown { left: 3, total: 3 }).collect();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], Message::Chunk { payload: 1, progress: 1.0 / 3.0 });
        assert_eq!(messages[2].progress(), 1.0);
        assert_eq!(messages[3], Message::Complete { payload: None });
    }

    #[test]
    fn empty_source_completes_immediately() {
        let mut it = Chunked::new(Countdown { left: 0, total: 0 });
        assert!(it.next().unwrap().is_complete());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn progress_is_clamped_and_monotone() {
        let progress: Vec<f64> = Chunked::new(Jittery(vec![0.5, 0.25, 1.5, f64::NAN]))
            .map(|m| m.progress())
            .collect();
        assert_eq!(progress, vec![0.5, 0.5, 1.0, 1.0, 1.0]);
    }
}
