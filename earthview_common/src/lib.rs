/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/// shared infrastructure of the earthview crates: error/cli definition macros,
/// filesystem helpers and RON config loading

use tracing_subscriber::EnvFilter;

pub mod macros;
pub mod fs;
pub mod configs;

mod errors;
pub use errors::{Result,EarthViewCommonError};

/// initialize a fmt tracing subscriber that takes its max level from RUST_LOG (defaulting to "info")
/// note this only succeeds if there is no global subscriber set yet, otherwise it is a no-op
pub fn init_tracing () {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter( filter)
        .with_target(false)
        .try_init();
}
