// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: wires the orientation service to the simulated device and
// locates configuration on disk.

pub mod data_dir;
pub mod simulator;
