//! Control payloads, command requests and command results
//!
//! A command request addresses one or many points, each carrying a control
//! payload. Results come back per point and are reduced into a task-level
//! summary; the reduction is a total precedence order over per-point
//! statuses (see [`CommandTaskResult::reduce`]).

use crate::measurement::Indexed;

/// Control code of a relay output block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    Nul,
    PulseOn,
    PulseOff,
    LatchOn,
    LatchOff,
    Trip,
    Close,
}

/// Control relay output block (CROB), the binary control payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRelayOutputBlock {
    pub code: ControlCode,
    pub count: u8,
    pub on_time_ms: u32,
    pub off_time_ms: u32,
}

impl ControlRelayOutputBlock {
    /// Create a CROB with the conventional defaults (single operation,
    /// 100ms on/off times)
    pub fn new(code: ControlCode) -> Self {
        Self {
            code,
            count: 1,
            on_time_ms: 100,
            off_time_ms: 100,
        }
    }
}

/// Analog output payload in one of the four wire widths
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalogOutput {
    Int16(i16),
    Int32(i32),
    Float32(f32),
    Double64(f64),
}

/// Control payload addressed to a single point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandPayload {
    Crob(ControlRelayOutputBlock),
    AnalogOutput(AnalogOutput),
}

/// One object header of a command request
///
/// All points of a header are transmitted under the same header on the
/// wire; header order and point order within a header are preserved
/// end-to-end.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandHeader {
    pub commands: Vec<Indexed<CommandPayload>>,
}

impl CommandHeader {
    pub fn new(commands: Vec<Indexed<CommandPayload>>) -> Self {
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Command request addressed to one or many points
///
/// Transient: exists only for the duration of one request. The same value
/// is used for the Select and the Operate phase of a select-then-operate
/// request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandRequest {
    headers: Vec<CommandHeader>,
}

impl CommandRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from pre-assembled headers, preserving their order
    pub fn with_headers(headers: Vec<CommandHeader>) -> Self {
        Self { headers }
    }

    /// Append a header of indexed payloads
    pub fn add_header(&mut self, header: CommandHeader) -> &mut Self {
        self.headers.push(header);
        self
    }

    /// Convenience: append a single-point CROB header
    pub fn add_crob(&mut self, crob: ControlRelayOutputBlock, index: u16) -> &mut Self {
        self.add_header(CommandHeader::new(vec![Indexed::new(
            index,
            CommandPayload::Crob(crob),
        )]))
    }

    /// Convenience: append a single-point analog output header
    pub fn add_analog_output(&mut self, output: AnalogOutput, index: u16) -> &mut Self {
        self.add_header(CommandHeader::new(vec![Indexed::new(
            index,
            CommandPayload::AnalogOutput(output),
        )]))
    }

    pub fn headers(&self) -> &[CommandHeader] {
        &self.headers
    }

    /// Total number of addressed points across all headers
    pub fn point_count(&self) -> usize {
        self.headers.iter().map(|h| h.commands.len()).sum()
    }

    /// Iterate over `(header_index, point_index, payload)` in wire order
    pub fn iter_points(&self) -> impl Iterator<Item = (usize, u16, &CommandPayload)> {
        self.headers.iter().enumerate().flat_map(|(hi, header)| {
            header
                .commands
                .iter()
                .map(move |cmd| (hi, cmd.index, &cmd.value))
        })
    }
}

/// Whether a command is validated before execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode {
    /// Execute immediately, no Select phase
    DirectOperate,
    /// Two-phase: Select every point first, Operate only the points whose
    /// Select succeeded
    SelectThenOperate,
}

/// Per-point command status as reported by the outstation (or synthesized
/// by the session core for points that never got an answer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Timeout,
    NoSelect,
    FormatError,
    NotSupported,
    AlreadyActive,
    HardwareError,
    Local,
    NotAuthorized,
    /// No answer arrived for this point before the request finished
    NoResponse,
    /// The session shut down while the request was pending
    Cancelled,
    /// Not yet resolved
    Undefined,
}

impl CommandStatus {
    pub fn is_success(self) -> bool {
        self == CommandStatus::Success
    }

    /// Statuses that classify the whole task as timed out when present on
    /// any point
    pub fn is_timeout_class(self) -> bool {
        matches!(self, CommandStatus::Timeout | CommandStatus::NoResponse)
    }
}

/// Where in the select/operate sequence a point ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPointState {
    /// No phase has resolved this point yet
    Init,
    /// Select succeeded, Operate not yet resolved
    Selected,
    /// Select failed; Operate was never attempted for this point
    SelectFail,
    /// Operate failed (or never got an answer)
    OperateFail,
    /// The full sequence succeeded
    Success,
}

/// Outcome for a single addressed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPointResult {
    pub header_index: usize,
    pub index: u16,
    pub state: CommandPointState,
    pub status: CommandStatus,
}

impl CommandPointResult {
    pub fn new(
        header_index: usize,
        index: u16,
        state: CommandPointState,
        status: CommandStatus,
    ) -> Self {
        Self {
            header_index,
            index,
            state,
            status,
        }
    }
}

/// Task-level completion code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCompletion {
    /// Every addressed point succeeded (trivially true for zero points)
    Success,
    /// Some points succeeded, some were rejected
    Partial,
    /// At least one point timed out or never answered
    FailureTimeout,
    /// Every point was rejected, none timed out
    FailureRejected,
    /// The session shut down before the request completed
    Cancelled,
}

impl TaskCompletion {
    pub fn is_success(self) -> bool {
        self == TaskCompletion::Success
    }
}

/// Aggregated result of one command request
///
/// Invariant: `summary` is [`TaskCompletion::Success`] if and only if every
/// item's status is [`CommandStatus::Success`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTaskResult {
    pub summary: TaskCompletion,
    results: Vec<CommandPointResult>,
}

impl CommandTaskResult {
    pub fn new(summary: TaskCompletion, results: Vec<CommandPointResult>) -> Self {
        Self { summary, results }
    }

    /// Reduce per-point results into a task result
    ///
    /// Precedence, evaluated in order:
    /// 1. all statuses `Success` (including the empty set) -> `Success`
    /// 2. any `Timeout`/`NoResponse` -> `FailureTimeout`
    /// 3. any `Success` mixed with failures -> `Partial`
    /// 4. otherwise (all points rejected) -> `FailureRejected`
    ///
    /// `Cancelled` summaries are never produced here; they are constructed
    /// directly by session shutdown.
    pub fn reduce(results: Vec<CommandPointResult>) -> Self {
        let summary = if results.iter().all(|r| r.status.is_success()) {
            TaskCompletion::Success
        } else if results.iter().any(|r| r.status.is_timeout_class()) {
            TaskCompletion::FailureTimeout
        } else if results.iter().any(|r| r.status.is_success()) {
            TaskCompletion::Partial
        } else {
            TaskCompletion::FailureRejected
        };
        Self { summary, results }
    }

    /// Per-point results in wire order
    pub fn results(&self) -> &[CommandPointResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(index: u16, state: CommandPointState, status: CommandStatus) -> CommandPointResult {
        CommandPointResult::new(0, index, state, status)
    }

    #[test]
    fn test_empty_result_set_is_success() {
        let result = CommandTaskResult::reduce(Vec::new());
        assert_eq!(result.summary, TaskCompletion::Success);
        assert!(result.results().is_empty());
    }

    #[test]
    fn test_all_success_reduces_to_success() {
        let result = CommandTaskResult::reduce(vec![
            point(1, CommandPointState::Success, CommandStatus::Success),
            point(2, CommandPointState::Success, CommandStatus::Success),
        ]);
        assert_eq!(result.summary, TaskCompletion::Success);
    }

    #[test]
    fn test_single_failure_forbids_success() {
        let result = CommandTaskResult::reduce(vec![point(
            7,
            CommandPointState::OperateFail,
            CommandStatus::HardwareError,
        )]);
        assert_eq!(result.summary, TaskCompletion::FailureRejected);
    }

    #[test]
    fn test_any_timeout_wins_over_partial() {
        let result = CommandTaskResult::reduce(vec![
            point(1, CommandPointState::Success, CommandStatus::Success),
            point(2, CommandPointState::SelectFail, CommandStatus::Timeout),
        ]);
        assert_eq!(result.summary, TaskCompletion::FailureTimeout);
    }

    #[test]
    fn test_mixed_success_and_reject_is_partial() {
        let result = CommandTaskResult::reduce(vec![
            point(1, CommandPointState::Success, CommandStatus::Success),
            point(2, CommandPointState::OperateFail, CommandStatus::NotSupported),
        ]);
        assert_eq!(result.summary, TaskCompletion::Partial);
    }

    #[test]
    fn test_request_point_iteration_preserves_order() {
        let mut request = CommandRequest::new();
        request.add_crob(
            ControlRelayOutputBlock::new(ControlCode::LatchOn),
            5,
        );
        request.add_header(CommandHeader::new(vec![
            Indexed::new(1, CommandPayload::AnalogOutput(AnalogOutput::Int16(42))),
            Indexed::new(2, CommandPayload::AnalogOutput(AnalogOutput::Int16(43))),
        ]));

        let points: Vec<(usize, u16)> = request
            .iter_points()
            .map(|(hi, index, _)| (hi, index))
            .collect();
        assert_eq!(points, vec![(0, 5), (1, 1), (1, 2)]);
        assert_eq!(request.point_count(), 3);
    }
}
