// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Explicit module registration for host pipelines.

use crate::block::Dispenser;
use crate::{Error, Result, Transport};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// ModuleInfo describes a transport module that a host can instantiate.
#[derive(Clone, Copy)]
pub struct ModuleInfo {
    /// Fully qualified module id, e.g. `http.reverse_proxy.transport.aws`.
    pub id: &'static str,
    /// Factory returning a fresh, unprovisioned instance.
    pub new: fn() -> Box<dyn Transport>,
}

impl ModuleInfo {
    /// Last label of the id, the name used in block configurations.
    pub fn name(&self) -> &'static str {
        self.id.rsplit('.').next().unwrap_or(self.id)
    }
}

impl Debug for ModuleInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleInfo").field("id", &self.id).finish()
    }
}

/// Registry holds the modules a host knows about.
///
/// Nothing registers itself: the host builds a registry and adds every
/// module it wants to offer.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    modules: BTreeMap<&'static str, ModuleInfo>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Registering the same id twice is an error.
    pub fn register(&mut self, info: ModuleInfo) -> Result<()> {
        if self.modules.contains_key(info.id) {
            return Err(Error::config_invalid(format!(
                "module already registered: {}",
                info.id
            )));
        }
        log::debug!("registering module {}", info.id);
        self.modules.insert(info.id, info);
        Ok(())
    }

    /// Get a registered module.
    pub fn get(&self, id: &str) -> Option<&ModuleInfo> {
        self.modules.get(id)
    }

    /// Ids of all registered modules, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.keys().copied()
    }

    /// Create a new instance of a registered module.
    pub fn new_module(&self, id: &str) -> Result<Box<dyn Transport>> {
        let info = self
            .get(id)
            .ok_or_else(|| Error::config_invalid(format!("unknown module: {id}")))?;
        Ok((info.new)())
    }

    /// Create a module from the segment at the dispenser's cursor.
    ///
    /// The segment's first token names the module within `namespace`, e.g.
    /// `aws` in namespace `http.reverse_proxy.transport`.
    pub fn load_block(&self, namespace: &str, d: &mut Dispenser) -> Result<Box<dyn Transport>> {
        if !d.next() {
            return Err(d.err("expected module name"));
        }
        let id = format!("{namespace}.{}", d.val());
        let Some(info) = self.get(&id) else {
            return Err(d.err(format!("unknown module '{}'", d.val())));
        };

        let mut module = (info.new)();
        d.prev();
        module.unmarshal_block(d)?;
        Ok(module)
    }
}
