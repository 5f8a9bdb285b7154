//! Shared test doubles for the session crate

use std::sync::Mutex;

use async_trait::async_trait;
use dnp3_core::{ClassField, CommandRequest, Dnp3Error, Dnp3Result};

use crate::channel::{ChannelState, RequestChannel};
use crate::command::RequestId;

/// Channel double that records every request it accepts
pub struct RecordingChannel {
    state: Mutex<ChannelState>,
    polls: Mutex<Vec<ClassField>>,
    selects: Mutex<Vec<(RequestId, CommandRequest)>>,
    operates: Mutex<Vec<(RequestId, CommandRequest)>>,
    direct_operates: Mutex<Vec<(RequestId, CommandRequest)>>,
    fail_sends: Mutex<bool>,
}

impl RecordingChannel {
    pub fn new(state: ChannelState) -> Self {
        Self {
            state: Mutex::new(state),
            polls: Mutex::new(Vec::new()),
            selects: Mutex::new(Vec::new()),
            operates: Mutex::new(Vec::new()),
            direct_operates: Mutex::new(Vec::new()),
            fail_sends: Mutex::new(false),
        }
    }

    pub fn set_state(&self, state: ChannelState) {
        *self.state.lock().unwrap() = state;
    }

    /// Make subsequent sends return a channel error
    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    pub fn polls(&self) -> Vec<ClassField> {
        self.polls.lock().unwrap().clone()
    }

    pub fn selects(&self) -> Vec<(RequestId, CommandRequest)> {
        self.selects.lock().unwrap().clone()
    }

    pub fn operates(&self) -> Vec<(RequestId, CommandRequest)> {
        self.operates.lock().unwrap().clone()
    }

    pub fn direct_operates(&self) -> Vec<(RequestId, CommandRequest)> {
        self.direct_operates.lock().unwrap().clone()
    }

    fn check_send(&self) -> Dnp3Result<()> {
        if *self.fail_sends.lock().unwrap() {
            Err(Dnp3Error::Channel("send refused by test".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RequestChannel for RecordingChannel {
    fn state(&self) -> ChannelState {
        *self.state.lock().unwrap()
    }

    async fn class_poll(&self, classes: ClassField) -> Dnp3Result<()> {
        self.check_send()?;
        self.polls.lock().unwrap().push(classes);
        Ok(())
    }

    async fn select(&self, id: RequestId, request: &CommandRequest) -> Dnp3Result<()> {
        self.check_send()?;
        self.selects.lock().unwrap().push((id, request.clone()));
        Ok(())
    }

    async fn operate(&self, id: RequestId, request: &CommandRequest) -> Dnp3Result<()> {
        self.check_send()?;
        self.operates.lock().unwrap().push((id, request.clone()));
        Ok(())
    }

    async fn direct_operate(&self, id: RequestId, request: &CommandRequest) -> Dnp3Result<()> {
        self.check_send()?;
        self.direct_operates
            .lock()
            .unwrap()
            .push((id, request.clone()));
        Ok(())
    }
}
