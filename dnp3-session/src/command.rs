//! Command submission tracking and result aggregation
//!
//! The tracker owns the table of in-flight command requests. Submission
//! assigns a unique [`RequestId`], issues the first phase on the channel
//! and parks a single-fire completion sender; the stack later delivers
//! per-point outcomes which are folded into the pending entry until the
//! request finishes. Removing the entry and firing the sender happen in
//! one step, so a completion can never be delivered twice.
//!
//! Select-then-operate ordering: Operate is only ever issued for points
//! whose Select succeeded. A point whose Select failed keeps the Select
//! failure as its terminal status; the other points of the same request
//! proceed independently.

use std::collections::HashMap;

use tokio::sync::oneshot;

use dnp3_core::{
    CommandHeader, CommandMode, CommandPointResult, CommandPointState, CommandRequest,
    CommandStatus, CommandTaskResult, Dnp3Error, Dnp3Result, Indexed, TaskCompletion,
};

use crate::channel::{PointOutcome, RequestChannel};

/// Unique identifier assigned to a command request at submit time
///
/// The underlying stack echoes this id when delivering phase outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Pending side of a submitted command
///
/// Await [`CommandHandle::wait`] for the task result. The result arrives
/// exactly once, even on timeout, disconnection or session shutdown.
#[derive(Debug)]
pub struct CommandHandle {
    id: RequestId,
    rx: oneshot::Receiver<CommandTaskResult>,
}

impl CommandHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Wait for the task result
    ///
    /// If the tracker itself was dropped before completing the request the
    /// result degrades to a `Cancelled` summary with no items.
    pub async fn wait(self) -> CommandTaskResult {
        self.rx
            .await
            .unwrap_or_else(|_| CommandTaskResult::new(TaskCompletion::Cancelled, Vec::new()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Select,
    Operate,
}

#[derive(Debug)]
struct PendingCommand {
    phase: Phase,
    request: CommandRequest,
    results: Vec<CommandPointResult>,
    tx: oneshot::Sender<CommandTaskResult>,
}

/// Table of in-flight command requests
#[derive(Debug, Default)]
pub struct CommandTracker {
    pending: HashMap<u64, PendingCommand>,
    next_id: u64,
}

impl CommandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests still awaiting completion
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Submit a command request
    ///
    /// A request with zero points completes immediately with a `Success`
    /// summary and an empty item list. Otherwise the first phase (Select,
    /// or Operate for direct mode) is issued on the channel before the
    /// entry is parked.
    ///
    /// # Errors
    /// `ChannelUnavailable` if the channel is not open; any channel error
    /// from issuing the first phase. In both cases nothing is parked and
    /// no completion will fire.
    pub async fn submit(
        &mut self,
        channel: &dyn RequestChannel,
        request: CommandRequest,
        mode: CommandMode,
    ) -> Dnp3Result<CommandHandle> {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = oneshot::channel();
        let handle = CommandHandle { id, rx };

        if request.point_count() == 0 {
            let _ = tx.send(CommandTaskResult::reduce(Vec::new()));
            return Ok(handle);
        }

        if !channel.state().is_open() {
            return Err(Dnp3Error::ChannelUnavailable);
        }

        let results: Vec<CommandPointResult> = request
            .iter_points()
            .map(|(header_index, index, _)| {
                CommandPointResult::new(
                    header_index,
                    index,
                    CommandPointState::Init,
                    CommandStatus::Undefined,
                )
            })
            .collect();

        let phase = match mode {
            CommandMode::DirectOperate => {
                channel.direct_operate(id, &request).await?;
                Phase::Operate
            }
            CommandMode::SelectThenOperate => {
                channel.select(id, &request).await?;
                Phase::Select
            }
        };

        log::debug!(
            "submitted command {} ({:?}, {} points)",
            id.0,
            mode,
            request.point_count()
        );
        self.pending.insert(
            id.0,
            PendingCommand {
                phase,
                request,
                results,
                tx,
            },
        );
        Ok(handle)
    }

    /// Fold a phase's per-point outcomes into the pending request
    ///
    /// After a Select phase the Operate phase is issued for the surviving
    /// points (or the request finishes immediately if none survived).
    /// After an Operate phase the request finishes. Outcomes for unknown
    /// ids (late deliveries after cancellation) are logged and dropped.
    pub async fn deliver(
        &mut self,
        channel: &dyn RequestChannel,
        id: RequestId,
        outcomes: &[PointOutcome],
    ) {
        let Some(mut cmd) = self.pending.remove(&id.0) else {
            log::warn!("outcome delivery for unknown command {}", id.0);
            return;
        };

        match cmd.phase {
            Phase::Select => {
                apply_select_outcomes(&mut cmd.results, outcomes);
                let operate_request = selected_subset(&cmd.request, &cmd.results);
                if operate_request.point_count() == 0 {
                    log::debug!("command {}: no point survived select", id.0);
                    finish(id, cmd.tx, cmd.results);
                    return;
                }
                match channel.operate(id, &operate_request).await {
                    Ok(()) => {
                        cmd.phase = Phase::Operate;
                        self.pending.insert(id.0, cmd);
                    }
                    Err(err) => {
                        log::warn!("command {}: operate send failed: {}", id.0, err);
                        mark_unresolved(&mut cmd.results, Phase::Operate, CommandStatus::NoResponse);
                        finish(id, cmd.tx, cmd.results);
                    }
                }
            }
            Phase::Operate => {
                apply_operate_outcomes(&mut cmd.results, outcomes);
                mark_unresolved(&mut cmd.results, Phase::Operate, CommandStatus::NoResponse);
                finish(id, cmd.tx, cmd.results);
            }
        }
    }

    /// Fail every pending request with a `Cancelled` summary (session
    /// shutdown)
    pub fn cancel_all(&mut self) {
        for (id, mut cmd) in self.pending.drain() {
            log::debug!("command {}: cancelled by shutdown", id);
            mark_unresolved(&mut cmd.results, cmd.phase, CommandStatus::Cancelled);
            let _ = cmd
                .tx
                .send(CommandTaskResult::new(TaskCompletion::Cancelled, cmd.results));
        }
    }

    /// Fail every pending request after a channel disconnect
    ///
    /// Unresolved points are marked `NoResponse`, so the reduced summary is
    /// timeout-classed.
    pub fn disconnect_all(&mut self) {
        for (id, mut cmd) in self.pending.drain() {
            log::debug!("command {}: channel lost while pending", id);
            mark_unresolved(&mut cmd.results, cmd.phase, CommandStatus::NoResponse);
            finish(RequestId(id), cmd.tx, cmd.results);
        }
    }
}

fn finish(id: RequestId, tx: oneshot::Sender<CommandTaskResult>, results: Vec<CommandPointResult>) {
    let result = CommandTaskResult::reduce(results);
    log::debug!("command {} complete: {:?}", id.0, result.summary);
    // The caller may have dropped the handle; completion is best-effort.
    let _ = tx.send(result);
}

/// Mark a Select outcome on the first matching unresolved point
fn apply_select_outcomes(results: &mut [CommandPointResult], outcomes: &[PointOutcome]) {
    for outcome in outcomes {
        let slot = results.iter_mut().find(|r| {
            r.state == CommandPointState::Init
                && r.header_index == outcome.header_index
                && r.index == outcome.index
        });
        let Some(slot) = slot else {
            log::warn!(
                "select outcome for unaddressed point {}/{}",
                outcome.header_index,
                outcome.index
            );
            continue;
        };
        if outcome.status.is_success() {
            slot.state = CommandPointState::Selected;
        } else {
            slot.state = CommandPointState::SelectFail;
            slot.status = outcome.status;
        }
    }
    // Points the outstation did not answer for fail their Select.
    for slot in results.iter_mut() {
        if slot.state == CommandPointState::Init {
            slot.state = CommandPointState::SelectFail;
            slot.status = CommandStatus::NoResponse;
        }
    }
}

fn apply_operate_outcomes(results: &mut [CommandPointResult], outcomes: &[PointOutcome]) {
    for outcome in outcomes {
        let slot = results.iter_mut().find(|r| {
            matches!(
                r.state,
                CommandPointState::Init | CommandPointState::Selected
            ) && r.header_index == outcome.header_index
                && r.index == outcome.index
        });
        let Some(slot) = slot else {
            log::warn!(
                "operate outcome for unaddressed point {}/{}",
                outcome.header_index,
                outcome.index
            );
            continue;
        };
        if outcome.status.is_success() {
            slot.state = CommandPointState::Success;
            slot.status = CommandStatus::Success;
        } else {
            slot.state = CommandPointState::OperateFail;
            slot.status = outcome.status;
        }
    }
}

/// Terminate any still-unresolved point with `status`
///
/// The terminal state depends on the phase the request died in: during
/// Select an unresolved point failed its Select; afterwards (including
/// direct operate, which has no Select) it failed its Operate.
fn mark_unresolved(results: &mut [CommandPointResult], phase: Phase, status: CommandStatus) {
    for slot in results.iter_mut() {
        match slot.state {
            CommandPointState::Init | CommandPointState::Selected => {
                slot.state = match phase {
                    Phase::Select => CommandPointState::SelectFail,
                    Phase::Operate => CommandPointState::OperateFail,
                };
                slot.status = status;
            }
            _ => {}
        }
    }
}

/// Build the Operate sub-request containing only the points whose Select
/// succeeded
///
/// The header layout of the original request is preserved (headers that
/// lost all their points stay present but empty) so the stack's outcome
/// deliveries keep using the original header indexes.
fn selected_subset(request: &CommandRequest, results: &[CommandPointResult]) -> CommandRequest {
    let mut headers: Vec<CommandHeader> = request
        .headers()
        .iter()
        .map(|_| CommandHeader::default())
        .collect();
    for ((header_index, index, payload), result) in request.iter_points().zip(results.iter()) {
        if result.state == CommandPointState::Selected {
            headers[header_index]
                .commands
                .push(Indexed::new(index, *payload));
        }
    }
    CommandRequest::with_headers(headers)
}
