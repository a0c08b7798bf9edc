//! The package value type.

use logix_core::{AgentId, Cell, PackageId};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackageStatus {
    Waiting,
    Picked,
    Delivered,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub pickup: Cell,
    pub dropoff: Cell,
    pub status: PackageStatus,
    pub assigned_to: Option<AgentId>,
}

impl Package {
    pub fn new(id: PackageId, name: impl Into<String>, pickup: Cell, dropoff: Cell) -> Self {
        Self {
            id,
            name: name.into(),
            pickup,
            dropoff,
            status: PackageStatus::Waiting,
            assigned_to: None,
        }
    }
}
