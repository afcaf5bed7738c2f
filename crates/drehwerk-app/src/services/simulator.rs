// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Replays scenario steps against an `OrientationService` running on the
// in-memory stub host, collecting everything the service hands back to the
// host runtime.

use std::sync::Arc;

use tracing::{debug, info};

use drehwerk_bridge::OrientationService;
use drehwerk_bridge::stub::{RecordingSink, StubActivity, StubHost};
use drehwerk_bridge::traits::HostLifecycle;
use drehwerk_core::config::BridgeConfig;
use drehwerk_core::error::Result;
use drehwerk_core::types::{ConfigurationChange, ScreenMetrics};

use crate::scenario::{ActivitySetup, DeviceSetup, Output, Scenario, Step};

/// A simulated device with the orientation service attached.
pub struct Simulator {
    host: StubHost,
    sink: RecordingSink,
    service: OrientationService,
}

impl Simulator {
    /// Set up the device, then construct the service (which captures the
    /// initial orientation).
    pub fn new(setup: &DeviceSetup, config: BridgeConfig) -> Self {
        let host = StubHost::new();
        host.set_configuration_orientation(setup.configuration);
        host.set_activity(setup.activity.map(stub_activity));

        let sink = RecordingSink::new();
        sink.set_live(setup.bridge_live);

        let service = OrientationService::new(Box::new(host.clone()), Arc::new(sink.clone()), config);
        Self {
            host,
            sink,
            service,
        }
    }

    /// Run a whole scenario. The first output line is always the module
    /// constants.
    pub fn run(scenario: &Scenario, config: BridgeConfig) -> Result<Vec<Output>> {
        let mut simulator = Self::new(&scenario.device, config);
        let mut outputs = vec![simulator.constants()];
        for (index, step) in scenario.steps.iter().enumerate() {
            debug!(index, ?step, "applying step");
            outputs.extend(simulator.apply(step)?);
        }
        info!(steps = scenario.steps.len(), lines = outputs.len(), "scenario finished");
        Ok(outputs)
    }

    pub fn constants(&self) -> Output {
        Output::Constants {
            module: self.service.name().to_owned(),
            constants: *self.service.constants(),
        }
    }

    /// Apply one step and return the outputs it produced.
    pub fn apply(&mut self, step: &Step) -> Result<Vec<Output>> {
        let mut outputs = Vec::new();

        match step {
            Step::Resume => self.service.on_host_resume(),
            Step::Pause => self.service.on_host_pause(),
            Step::Destroy => self.service.on_host_destroy(),
            Step::Rotate {
                rotation,
                width,
                height,
                configuration,
            } => {
                self.host.rotate(*rotation, ScreenMetrics::new(*width, *height));
                if let Some(code) = configuration {
                    self.host.set_configuration_orientation(*code);
                }
                self.broadcast(ConfigurationChange {
                    orientation: *configuration,
                });
            }
            Step::Activity { activity } => self.host.set_activity(activity.map(stub_activity)),
            Step::Bridge { live } => self.sink.set_live(*live),
            Step::Broadcast { orientation } => self.broadcast(ConfigurationChange {
                orientation: *orientation,
            }),
            Step::Call { method } => {
                self.service.invoke(method, |reply| {
                    outputs.push(Output::Reply {
                        method: method.clone(),
                        args: reply.to_args(),
                    })
                })?;
            }
        }

        outputs.extend(
            self.sink
                .take_events()
                .into_iter()
                .map(|(name, payload)| Output::Event { name, payload }),
        );
        Ok(outputs)
    }

    /// Deliver a configuration change to every receiver registered for the
    /// configured broadcast action.
    fn broadcast(&self, change: ConfigurationChange) {
        let action = &self.service.config().broadcast_action;
        for id in self.host.subscribers_for(action) {
            self.service.on_configuration_changed(id, change);
        }
    }
}

fn stub_activity(setup: ActivitySetup) -> StubActivity {
    StubActivity {
        rotation: setup.rotation,
        metrics: ScreenMetrics::new(setup.width, setup.height),
    }
}
