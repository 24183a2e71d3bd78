// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! In-memory [`CommandRunner`] for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use exec::{CommandRunner, ContainerRef, ExecError};

/// Replays scripted replies per (pod, command), in order, and records every call.
///
/// A command without a (remaining) scripted reply fails.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    replies: Mutex<HashMap<(String, String), VecDeque<Option<String>>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRunner {
    /// Queue the next reply of `cmd` in `container`; `None` makes the command fail.
    pub(crate) fn reply(&self, container: &ContainerRef, cmd: &str, reply: Option<&str>) {
        self.replies
            .lock()
            .unwrap()
            .entry((container.pod.clone(), cmd.to_string()))
            .or_default()
            .push_back(reply.map(str::to_string));
    }

    /// All (pod, command) pairs executed so far, in order.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn exec(&self, container: &ContainerRef, cmd: &str) -> Result<String, ExecError> {
        let key = (container.pod.clone(), cmd.to_string());
        self.calls.lock().unwrap().push(key.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .flatten();
        reply.ok_or_else(|| ExecError::Spawn {
            program: "scripted".to_string(),
            source: std::io::Error::other(format!("no reply scripted for '{cmd}'")),
        })
    }
}
