//! Measurement dispatch
//!
//! Inbound data arrives as homogeneous batches tagged with their
//! measurement kind ([`MeasurementBatch`]). The dispatcher routes each
//! batch to the per-kind method of a single [`SoeHandler`], selected by an
//! exhaustive match — the closed kind set makes "unregistered type" a
//! compile error instead of a runtime lookup failure.
//!
//! Handlers run inside callbacks driven by the stack's worker threads, so
//! a handler that panics must never unwind into the stack's dispatch loop:
//! every handler invocation is wrapped and a panic is downgraded to an
//! error log, dropping only the affected batch.

use std::panic::{catch_unwind, AssertUnwindSafe};

use dnp3_core::{
    Analog, AnalogOutputStatus, Binary, BinaryOutputStatus, Counter, DoubleBitBinary,
    FragmentInfo, FrozenCounter, HeaderInfo, Indexed, MeasurementBatch, MeasurementType,
    OctetString, TimeAndInterval,
};

fn log_entries<T: std::fmt::Debug>(
    kind: MeasurementType,
    info: &HeaderInfo,
    values: &[Indexed<T>],
) {
    for entry in values {
        log::info!(
            "{} {} [{}] = {:?}",
            kind,
            info.variation,
            entry.index,
            entry.value
        );
    }
}

/// Application-side sink for sequence-of-events data
///
/// One method per measurement kind plus fragment boundaries. Every default
/// implementation logs the (index, value) pairs in arrival order, so an
/// application only overrides the kinds it cares about — persisting Analog
/// updates or alarming on Binary transitions without touching dispatch
/// logic.
///
/// The group/variation context in [`HeaderInfo`] is constant across a
/// batch and supplied once per batch.
#[cfg_attr(test, mockall::automock)]
pub trait SoeHandler: Send {
    /// Called before the first batch of a response fragment
    fn begin_fragment(&mut self, info: &FragmentInfo) {
        log::trace!(
            "fragment start (seq={}, unsolicited={})",
            info.sequence,
            info.unsolicited
        );
    }

    /// Called after the last batch of a response fragment
    fn end_fragment(&mut self, info: &FragmentInfo) {
        log::trace!("fragment end (seq={})", info.sequence);
    }

    fn handle_binary(&mut self, info: &HeaderInfo, values: &[Indexed<Binary>]) {
        log_entries(MeasurementType::Binary, info, values);
    }

    fn handle_double_bit_binary(&mut self, info: &HeaderInfo, values: &[Indexed<DoubleBitBinary>]) {
        log_entries(MeasurementType::DoubleBitBinary, info, values);
    }

    fn handle_analog(&mut self, info: &HeaderInfo, values: &[Indexed<Analog>]) {
        log_entries(MeasurementType::Analog, info, values);
    }

    fn handle_counter(&mut self, info: &HeaderInfo, values: &[Indexed<Counter>]) {
        log_entries(MeasurementType::Counter, info, values);
    }

    fn handle_frozen_counter(&mut self, info: &HeaderInfo, values: &[Indexed<FrozenCounter>]) {
        log_entries(MeasurementType::FrozenCounter, info, values);
    }

    fn handle_binary_output_status(
        &mut self,
        info: &HeaderInfo,
        values: &[Indexed<BinaryOutputStatus>],
    ) {
        log_entries(MeasurementType::BinaryOutputStatus, info, values);
    }

    fn handle_analog_output_status(
        &mut self,
        info: &HeaderInfo,
        values: &[Indexed<AnalogOutputStatus>],
    ) {
        log_entries(MeasurementType::AnalogOutputStatus, info, values);
    }

    fn handle_octet_string(&mut self, info: &HeaderInfo, values: &[Indexed<OctetString>]) {
        log_entries(MeasurementType::OctetString, info, values);
    }

    fn handle_time_and_interval(&mut self, info: &HeaderInfo, values: &[Indexed<TimeAndInterval>]) {
        log_entries(MeasurementType::TimeAndInterval, info, values);
    }
}

/// Handler that keeps every default (logging) implementation
pub struct LoggingSoeHandler;

impl SoeHandler for LoggingSoeHandler {}

/// Routes measurement batches to the registered handler
pub struct MeasurementDispatcher {
    handler: Box<dyn SoeHandler>,
}

impl Default for MeasurementDispatcher {
    fn default() -> Self {
        Self::new(Box::new(LoggingSoeHandler))
    }
}

impl MeasurementDispatcher {
    pub fn new(handler: Box<dyn SoeHandler>) -> Self {
        Self { handler }
    }

    /// Swap in a new handler, returning the previous one
    pub fn replace_handler(&mut self, handler: Box<dyn SoeHandler>) -> Box<dyn SoeHandler> {
        std::mem::replace(&mut self.handler, handler)
    }

    pub fn fragment_start(&mut self, info: &FragmentInfo) {
        self.guarded("begin_fragment", |handler| handler.begin_fragment(info));
    }

    pub fn fragment_end(&mut self, info: &FragmentInfo) {
        self.guarded("end_fragment", |handler| handler.end_fragment(info));
    }

    /// Route one batch to the handler method matching its kind
    pub fn process(&mut self, info: &HeaderInfo, batch: &MeasurementBatch) {
        self.guarded("process", |handler| match batch {
            MeasurementBatch::Binary(values) => handler.handle_binary(info, values),
            MeasurementBatch::DoubleBitBinary(values) => {
                handler.handle_double_bit_binary(info, values)
            }
            MeasurementBatch::Analog(values) => handler.handle_analog(info, values),
            MeasurementBatch::Counter(values) => handler.handle_counter(info, values),
            MeasurementBatch::FrozenCounter(values) => handler.handle_frozen_counter(info, values),
            MeasurementBatch::BinaryOutputStatus(values) => {
                handler.handle_binary_output_status(info, values)
            }
            MeasurementBatch::AnalogOutputStatus(values) => {
                handler.handle_analog_output_status(info, values)
            }
            MeasurementBatch::OctetString(values) => handler.handle_octet_string(info, values),
            MeasurementBatch::TimeAndInterval(values) => {
                handler.handle_time_and_interval(info, values)
            }
        });
    }

    // A panicking handler must not unwind into the stack's worker thread.
    fn guarded<F: FnOnce(&mut dyn SoeHandler)>(&mut self, what: &str, f: F) {
        let handler = self.handler.as_mut();
        if catch_unwind(AssertUnwindSafe(|| f(handler))).is_err() {
            log::error!("measurement handler panicked during {}; data dropped", what);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use dnp3_core::{DoubleBit, Flags, Timestamp, Variation};

    fn info() -> HeaderInfo {
        HeaderInfo::new(Variation::new(30, 1), 0, false)
    }

    fn all_batches() -> Vec<MeasurementBatch> {
        vec![
            MeasurementBatch::Binary(vec![Indexed::new(0, Binary::new(true))]),
            MeasurementBatch::DoubleBitBinary(vec![Indexed::new(
                1,
                DoubleBitBinary::new(DoubleBit::DeterminedOn),
            )]),
            MeasurementBatch::Analog(vec![Indexed::new(2, Analog::new(1.5))]),
            MeasurementBatch::Counter(vec![Indexed::new(3, Counter::new(7))]),
            MeasurementBatch::FrozenCounter(vec![Indexed::new(4, FrozenCounter::new(8))]),
            MeasurementBatch::BinaryOutputStatus(vec![Indexed::new(
                5,
                BinaryOutputStatus::new(false),
            )]),
            MeasurementBatch::AnalogOutputStatus(vec![Indexed::new(
                6,
                AnalogOutputStatus::new(2.5),
            )]),
            MeasurementBatch::OctetString(vec![Indexed::new(7, OctetString::new(&b"id"[..]))]),
            MeasurementBatch::TimeAndInterval(vec![Indexed::new(
                8,
                TimeAndInterval {
                    time: Timestamp::new(0),
                    interval: 60,
                    units: 1,
                },
            )]),
        ]
    }

    /// Records which handler method ran, and with which indexes
    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<(MeasurementType, Vec<u16>)>>>,
        fragments: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn record<T>(&self, kind: MeasurementType, values: &[Indexed<T>]) {
            self.calls
                .lock()
                .unwrap()
                .push((kind, values.iter().map(|v| v.index).collect()));
        }
    }

    impl SoeHandler for Recorder {
        fn begin_fragment(&mut self, info: &FragmentInfo) {
            self.fragments
                .lock()
                .unwrap()
                .push(format!("begin {}", info.sequence));
        }

        fn end_fragment(&mut self, info: &FragmentInfo) {
            self.fragments
                .lock()
                .unwrap()
                .push(format!("end {}", info.sequence));
        }

        fn handle_binary(&mut self, _info: &HeaderInfo, values: &[Indexed<Binary>]) {
            self.record(MeasurementType::Binary, values);
        }

        fn handle_double_bit_binary(
            &mut self,
            _info: &HeaderInfo,
            values: &[Indexed<DoubleBitBinary>],
        ) {
            self.record(MeasurementType::DoubleBitBinary, values);
        }

        fn handle_analog(&mut self, _info: &HeaderInfo, values: &[Indexed<Analog>]) {
            self.record(MeasurementType::Analog, values);
        }

        fn handle_counter(&mut self, _info: &HeaderInfo, values: &[Indexed<Counter>]) {
            self.record(MeasurementType::Counter, values);
        }

        fn handle_frozen_counter(&mut self, _info: &HeaderInfo, values: &[Indexed<FrozenCounter>]) {
            self.record(MeasurementType::FrozenCounter, values);
        }

        fn handle_binary_output_status(
            &mut self,
            _info: &HeaderInfo,
            values: &[Indexed<BinaryOutputStatus>],
        ) {
            self.record(MeasurementType::BinaryOutputStatus, values);
        }

        fn handle_analog_output_status(
            &mut self,
            _info: &HeaderInfo,
            values: &[Indexed<AnalogOutputStatus>],
        ) {
            self.record(MeasurementType::AnalogOutputStatus, values);
        }

        fn handle_octet_string(&mut self, _info: &HeaderInfo, values: &[Indexed<OctetString>]) {
            self.record(MeasurementType::OctetString, values);
        }

        fn handle_time_and_interval(
            &mut self,
            _info: &HeaderInfo,
            values: &[Indexed<TimeAndInterval>],
        ) {
            self.record(MeasurementType::TimeAndInterval, values);
        }
    }

    #[test]
    fn test_type_matrix_routes_each_kind_to_its_handler() {
        let recorder = Recorder::default();
        let mut dispatcher = MeasurementDispatcher::new(Box::new(recorder.clone()));

        for batch in all_batches() {
            dispatcher.process(&info(), &batch);
        }

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 9, "each batch routed exactly once");
        let kinds: Vec<MeasurementType> = calls.iter().map(|(kind, _)| *kind).collect();
        let expected: Vec<MeasurementType> = all_batches()
            .iter()
            .map(|batch| batch.measurement_type())
            .collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_entries_arrive_in_order() {
        let recorder = Recorder::default();
        let mut dispatcher = MeasurementDispatcher::new(Box::new(recorder.clone()));

        let batch = MeasurementBatch::Analog(vec![
            Indexed::new(9, Analog::new(1.0)),
            Indexed::new(3, Analog::new(2.0)),
            Indexed::new(7, Analog::new(3.0)),
        ]);
        dispatcher.process(&info(), &batch);

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].1, vec![9, 3, 7]);
    }

    #[test]
    fn test_fragment_boundaries_are_forwarded() {
        let recorder = Recorder::default();
        let mut dispatcher = MeasurementDispatcher::new(Box::new(recorder.clone()));

        let fragment = FragmentInfo::new(4, true);
        dispatcher.fragment_start(&fragment);
        dispatcher.process(
            &info(),
            &MeasurementBatch::Binary(vec![Indexed::new(0, Binary::new(true))]),
        );
        dispatcher.fragment_end(&fragment);

        let fragments = recorder.fragments.lock().unwrap();
        assert_eq!(*fragments, vec!["begin 4".to_string(), "end 4".to_string()]);
    }

    #[test]
    fn test_mock_handler_receives_only_the_matching_call() {
        let mut mock = MockSoeHandler::new();
        mock.expect_handle_analog()
            .withf(|_info, values| values.len() == 1 && values[0].index == 2)
            .times(1)
            .return_const(());

        let mut dispatcher = MeasurementDispatcher::new(Box::new(mock));
        dispatcher.process(
            &info(),
            &MeasurementBatch::Analog(vec![Indexed::new(2, Analog::new(1.5))]),
        );
    }

    #[test]
    fn test_replace_handler_redirects_subsequent_batches() {
        let first = Recorder::default();
        let second = Recorder::default();
        let mut dispatcher = MeasurementDispatcher::new(Box::new(first.clone()));

        dispatcher.process(
            &info(),
            &MeasurementBatch::Binary(vec![Indexed::new(0, Binary::new(true))]),
        );
        dispatcher.replace_handler(Box::new(second.clone()));
        dispatcher.process(
            &info(),
            &MeasurementBatch::Binary(vec![Indexed::new(1, Binary::new(false))]),
        );

        assert_eq!(first.calls.lock().unwrap().len(), 1);
        assert_eq!(second.calls.lock().unwrap().len(), 1);
    }

    struct PanickingHandler;

    impl SoeHandler for PanickingHandler {
        fn handle_binary(&mut self, _info: &HeaderInfo, _values: &[Indexed<Binary>]) {
            panic!("application bug");
        }
    }

    #[test]
    fn test_handler_panic_is_contained() {
        let mut dispatcher = MeasurementDispatcher::new(Box::new(PanickingHandler));
        let batch = MeasurementBatch::Binary(vec![Indexed::new(
            0,
            Binary::new(true).with_flags(Flags::COMM_LOST),
        )]);

        // Must not unwind out of process().
        dispatcher.process(&info(), &batch);

        // The dispatcher stays usable; analog still hits the default
        // (logging) implementation without panicking.
        dispatcher.process(
            &info(),
            &MeasurementBatch::Analog(vec![Indexed::new(1, Analog::new(0.0))]),
        );
    }
}
