//! Out-of-scope collaborators the command and swarm handlers call into.
//! The autopilot bridge and job scheduler are explicitly out of scope (they
//! model actual flight control / task scheduling, neither of which this
//! crate implements); these traits exist so the handlers have something
//! concrete to invoke and log through.

use log::info;

use crate::payload::command::Command;

/// Executes a validated command against the vehicle. The default
/// implementation just logs what would have been executed.
pub trait VehicleBridge: Send + Sync {
    fn execute(&self, command: &Command);
}

pub struct LoggingVehicleBridge;

impl VehicleBridge for LoggingVehicleBridge {
    fn execute(&self, command: &Command) {
        info!("executing {} (stub vehicle bridge)", command.name());
    }
}

/// Schedules swarm task delays/coordination. Out of scope beyond logging
/// that a task was accepted.
pub trait JobScheduler: Send + Sync {
    fn schedule(&self, task_id: u32, delay_ms: u32);
}

pub struct LoggingJobScheduler;

impl JobScheduler for LoggingJobScheduler {
    fn schedule(&self, task_id: u32, delay_ms: u32) {
        info!("scheduling swarm task {task_id} with {delay_ms}ms delay (stub job scheduler)");
    }
}
