//! Resource namespaces (sub-clients).
//!
//! The API is split into namespaces (`hr`, `finance`, `ticket`, ...). Each one
//! is described by a static [`NamespaceDescriptor`]; which of them a client
//! exposes is decided by the [`Namespaces`] toggles at build time. A
//! [`NamespaceClient`] only builds versioned URLs and forwards to the
//! client's four verbs.

use std::fmt;

use serde_json::Value;

use crate::client::OdeskClient;
use crate::error::OdeskResult;
use crate::network::{API_ROOT, GDS_ROOT};
use crate::query::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Finance,
    Finreport,
    Hr,
    Mc,
    Oconomy,
    NonauthOconomy,
    Provider,
    Task,
    Team,
    Ticket,
    Timereport,
    Url,
}

impl Namespace {
    pub const ALL: [Namespace; 12] = [
        Self::Finance,
        Self::Finreport,
        Self::Hr,
        Self::Mc,
        Self::Oconomy,
        Self::NonauthOconomy,
        Self::Provider,
        Self::Task,
        Self::Team,
        Self::Ticket,
        Self::Timereport,
        Self::Url,
    ];

    pub fn descriptor(&self) -> &'static NamespaceDescriptor {
        match self {
            Self::Finance => &REGISTRY[0],
            Self::Finreport => &REGISTRY[1],
            Self::Hr => &REGISTRY[2],
            Self::Mc => &REGISTRY[3],
            Self::Oconomy => &REGISTRY[4],
            Self::NonauthOconomy => &REGISTRY[5],
            Self::Provider => &REGISTRY[6],
            Self::Task => &REGISTRY[7],
            Self::Team => &REGISTRY[8],
            Self::Ticket => &REGISTRY[9],
            Self::Timereport => &REGISTRY[10],
            Self::Url => &REGISTRY[11],
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which path root a namespace lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoot {
    Api,
    Gds,
}

impl ApiRoot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => API_ROOT,
            Self::Gds => GDS_ROOT,
        }
    }
}

/// Static description of a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDescriptor {
    pub namespace: Namespace,
    pub name: &'static str,
    pub root: ApiRoot,
    pub prefix: &'static str,
    pub version: u32,
}

impl NamespaceDescriptor {
    /// `/<root>/<prefix>/v<version>/<path>`
    pub fn path(&self, path: &str) -> String {
        format!(
            "/{}/{}/v{}/{}",
            self.root.as_str(),
            self.prefix,
            self.version,
            path.trim_start_matches('/')
        )
    }
}

/// All known namespaces, indexed in [`Namespace::ALL`] order.
pub static REGISTRY: [NamespaceDescriptor; 12] = [
    NamespaceDescriptor {
        namespace: Namespace::Finance,
        name: "finance",
        root: ApiRoot::Api,
        prefix: "finance",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Finreport,
        name: "finreport",
        root: ApiRoot::Gds,
        prefix: "finreports",
        version: 2,
    },
    NamespaceDescriptor {
        namespace: Namespace::Hr,
        name: "hr",
        root: ApiRoot::Api,
        prefix: "hr",
        version: 2,
    },
    NamespaceDescriptor {
        namespace: Namespace::Mc,
        name: "mc",
        root: ApiRoot::Api,
        prefix: "mc",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Oconomy,
        name: "oconomy",
        root: ApiRoot::Api,
        prefix: "oconomy",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::NonauthOconomy,
        name: "nonauth_oconomy",
        root: ApiRoot::Api,
        prefix: "oconomy",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Provider,
        name: "provider",
        root: ApiRoot::Api,
        prefix: "profiles",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Task,
        name: "task",
        root: ApiRoot::Api,
        prefix: "otask",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Team,
        name: "team",
        root: ApiRoot::Api,
        prefix: "team",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Ticket,
        name: "ticket",
        root: ApiRoot::Api,
        prefix: "tickets",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Timereport,
        name: "timereport",
        root: ApiRoot::Gds,
        prefix: "timereports",
        version: 1,
    },
    NamespaceDescriptor {
        namespace: Namespace::Url,
        name: "url",
        root: ApiRoot::Api,
        prefix: "auth",
        version: 1,
    },
];

/// One on/off switch per namespace. Everything is on by default.
///
/// `nonauth_oconomy` follows the `oconomy` switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespaces {
    pub finance: bool,
    pub finreport: bool,
    pub hr: bool,
    pub mc: bool,
    pub oconomy: bool,
    pub provider: bool,
    pub task: bool,
    pub team: bool,
    pub ticket: bool,
    pub timereport: bool,
    pub url: bool,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::all()
    }
}

impl Namespaces {
    pub fn all() -> Self {
        Self::uniform(true)
    }

    pub fn none() -> Self {
        Self::uniform(false)
    }

    fn uniform(enabled: bool) -> Self {
        Self {
            finance: enabled,
            finreport: enabled,
            hr: enabled,
            mc: enabled,
            oconomy: enabled,
            provider: enabled,
            task: enabled,
            team: enabled,
            ticket: enabled,
            timereport: enabled,
            url: enabled,
        }
    }

    fn slot(&mut self, namespace: Namespace) -> &mut bool {
        match namespace {
            Namespace::Finance => &mut self.finance,
            Namespace::Finreport => &mut self.finreport,
            Namespace::Hr => &mut self.hr,
            Namespace::Mc => &mut self.mc,
            Namespace::Oconomy | Namespace::NonauthOconomy => &mut self.oconomy,
            Namespace::Provider => &mut self.provider,
            Namespace::Task => &mut self.task,
            Namespace::Team => &mut self.team,
            Namespace::Ticket => &mut self.ticket,
            Namespace::Timereport => &mut self.timereport,
            Namespace::Url => &mut self.url,
        }
    }

    /// Builder-style toggle.
    pub fn set(mut self, namespace: Namespace, enabled: bool) -> Self {
        *self.slot(namespace) = enabled;
        self
    }

    pub fn is_enabled(&self, namespace: Namespace) -> bool {
        match namespace {
            Namespace::Finance => self.finance,
            Namespace::Finreport => self.finreport,
            Namespace::Hr => self.hr,
            Namespace::Mc => self.mc,
            Namespace::Oconomy | Namespace::NonauthOconomy => self.oconomy,
            Namespace::Provider => self.provider,
            Namespace::Task => self.task,
            Namespace::Team => self.team,
            Namespace::Ticket => self.ticket,
            Namespace::Timereport => self.timereport,
            Namespace::Url => self.url,
        }
    }

    /// Descriptors of every enabled namespace.
    pub fn enabled(&self) -> impl Iterator<Item = &'static NamespaceDescriptor> + '_ {
        Namespace::ALL
            .into_iter()
            .filter(|ns| self.is_enabled(*ns))
            .map(|ns| ns.descriptor())
    }
}

/// Thin sub-client for one namespace.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceClient<'a> {
    client: &'a OdeskClient,
    descriptor: &'static NamespaceDescriptor,
}

impl<'a> NamespaceClient<'a> {
    pub(crate) fn new(client: &'a OdeskClient, descriptor: &'static NamespaceDescriptor) -> Self {
        Self { client, descriptor }
    }

    pub fn namespace(&self) -> Namespace {
        self.descriptor.namespace
    }

    pub fn descriptor(&self) -> &'static NamespaceDescriptor {
        self.descriptor
    }

    /// Full URL (without format suffix) for a path inside this namespace.
    pub fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.client.base_url(), self.descriptor.path(path))
    }

    pub fn get(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.client.get(&self.full_url(path), params)
    }

    pub fn post(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.client.post(&self.full_url(path), params)
    }

    pub fn put(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.client.put(&self.full_url(path), params)
    }

    pub fn delete(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.client.delete(&self.full_url(path), params)
    }
}
