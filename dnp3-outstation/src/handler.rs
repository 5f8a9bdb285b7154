//! Outstation command servicing
//!
//! The master relays controls to the outstation as Select and Operate
//! requests; the outstation answers each addressed point with a
//! [`CommandStatus`]. Applications implement [`CommandHandler`] to decide
//! those statuses, and the free functions below run a whole request
//! through a handler, bracketed by `begin`/`end`, producing per-point
//! results in wire order.

use dnp3_core::{
    CommandPayload, CommandPointResult, CommandPointState, CommandRequest, CommandStatus,
};

/// How an Operate request reached the outstation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperateType {
    /// Second phase of a select-then-operate sequence
    SelectBeforeOperate,
    /// Single-phase direct operate
    DirectOperate,
    /// Direct operate without an acknowledgment response
    DirectOperateNoAck,
}

/// Application-side servicing of Select and Operate
///
/// `begin` and `end` bracket the points of one request so a handler can
/// treat them transactionally (e.g. validate the whole set before any
/// actuation).
pub trait CommandHandler: Send {
    /// A command request is about to be serviced
    fn begin(&mut self) {}

    /// A command request has been fully serviced
    fn end(&mut self) {}

    /// Validate a control without executing it
    fn select(&mut self, command: &CommandPayload, index: u16) -> CommandStatus;

    /// Execute a control
    fn operate(
        &mut self,
        command: &CommandPayload,
        index: u16,
        operate_type: OperateType,
    ) -> CommandStatus;
}

/// Handler that accepts every control, logging each point
///
/// Useful for bring-up and tests; production applications implement
/// [`CommandHandler`] themselves.
pub struct SuccessCommandHandler;

impl CommandHandler for SuccessCommandHandler {
    fn select(&mut self, command: &CommandPayload, index: u16) -> CommandStatus {
        log::debug!("select [{}]: {:?}", index, command);
        CommandStatus::Success
    }

    fn operate(
        &mut self,
        command: &CommandPayload,
        index: u16,
        operate_type: OperateType,
    ) -> CommandStatus {
        log::debug!("operate [{}] ({:?}): {:?}", index, operate_type, command);
        CommandStatus::Success
    }
}

/// Run the Select phase of a request through a handler
pub fn select_all(
    handler: &mut dyn CommandHandler,
    request: &CommandRequest,
) -> Vec<CommandPointResult> {
    handler.begin();
    let results = request
        .iter_points()
        .map(|(header_index, index, payload)| {
            let status = handler.select(payload, index);
            let state = if status.is_success() {
                CommandPointState::Selected
            } else {
                CommandPointState::SelectFail
            };
            CommandPointResult::new(header_index, index, state, status)
        })
        .collect();
    handler.end();
    results
}

/// Run the Operate phase of a request through a handler
pub fn operate_all(
    handler: &mut dyn CommandHandler,
    request: &CommandRequest,
    operate_type: OperateType,
) -> Vec<CommandPointResult> {
    handler.begin();
    let results = request
        .iter_points()
        .map(|(header_index, index, payload)| {
            let status = handler.operate(payload, index, operate_type);
            let state = if status.is_success() {
                CommandPointState::Success
            } else {
                CommandPointState::OperateFail
            };
            CommandPointResult::new(header_index, index, state, status)
        })
        .collect();
    handler.end();
    results
}
