//=========================================================================
// Event Collector
//=========================================================================
//
// Player event collector with bounded draining and shutdown detection.
//
// Architecture:
//   Receiver<PlayerEvent> → collect_frame() → events → TickControl
//
// Bounded draining keeps one pump from starving the host loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlayerEvent;

//=== TickControl =========================================================

/// Pump control signal returned to the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects queued player events, at most a bounded batch per frame.
pub(crate) struct EventCollector {
    receiver: Receiver<PlayerEvent>,
    events: Vec<PlayerEvent>,
}

impl EventCollector {
    pub(crate) const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(8),
        }
    }

    /// Collects pending events up to the per-frame bound.
    ///
    /// Stops early at `Shutdown` or a disconnected channel and reports
    /// `Exit`; events received before that are still returned.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlayerEvent::Shutdown) => return TickControl::Exit,
                Ok(event) => {
                    self.events.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!("Player event backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Takes ownership of the collected events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<PlayerEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.take_events().is_empty());
    }

    #[test]
    fn collect_keeps_arrival_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlayerEvent::ClickId("chest".into())).unwrap();
        tx.send(PlayerEvent::Advance).unwrap();
        tx.send(PlayerEvent::Choose(1)).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert_eq!(
            collector.take_events(),
            [
                PlayerEvent::ClickId("chest".into()),
                PlayerEvent::Advance,
                PlayerEvent::Choose(1)
            ]
        );
    }

    #[test]
    fn collect_returns_exit_on_shutdown() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlayerEvent::Advance).unwrap();
        tx.send(PlayerEvent::Shutdown).unwrap();
        tx.send(PlayerEvent::Choose(0)).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
        assert_eq!(collector.take_events(), [PlayerEvent::Advance]);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<PlayerEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for _ in 0..EventCollector::MAX_EVENTS_PER_FRAME + 5 {
            tx.send(PlayerEvent::Advance).unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.take_events().len(), EventCollector::MAX_EVENTS_PER_FRAME);

        collector.collect_frame();
        assert_eq!(collector.take_events().len(), 5);
    }
}
