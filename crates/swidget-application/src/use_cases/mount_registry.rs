//! Host mount points
//!
//! A region is a host-owned slot in the host's render tree. Each mounted
//! swidget instance gets its own mount point inside a region, so one
//! instance's unmount never touches another's output.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use swidget_domain::error::{Error, Result};
use swidget_domain::value_objects::{ModuleKey, Node};
use tracing::debug;
use uuid::Uuid;

/// Identity of one mount point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountPointId(Uuid);

impl MountPointId {
    /// Fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MountPointId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MountPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
enum Occupant {
    Instance(MountPointId),
    Fallback(ModuleKey),
}

#[derive(Debug, Clone)]
struct MountPoint {
    occupant: Occupant,
    node: Node,
}

#[derive(Debug, Default)]
struct Region {
    points: Vec<MountPoint>,
}

/// Registry of host regions and their mount points
#[derive(Clone, Default)]
pub struct MountRegistry {
    regions: Arc<RwLock<BTreeMap<String, Region>>>,
}

impl MountRegistry {
    /// Registry without regions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region; an existing region is left as is
    pub fn create_region<S: Into<String>>(&self, region: S) {
        let region = region.into();
        debug!(region = %region, "Created mount region");
        self.write().entry(region).or_default();
    }

    /// Remove a region and everything mounted in it
    pub fn remove_region(&self, region: &str) -> bool {
        let removed = self.write().remove(region).is_some();
        if removed {
            debug!(region, "Removed mount region");
        }
        removed
    }

    /// True if the region exists
    pub fn has_region(&self, region: &str) -> bool {
        self.read().contains_key(region)
    }

    /// Region names, sorted
    pub fn regions(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Attach an empty mount point for `id`
    pub fn attach(&self, region: &str, id: MountPointId) -> Result<()> {
        let mut regions = self.write();
        let points = &mut regions
            .get_mut(region)
            .ok_or_else(|| Error::mount_target_unavailable(region))?
            .points;
        if !points.iter().any(|point| matches!(point.occupant, Occupant::Instance(p) if p == id)) {
            points.push(MountPoint {
                occupant: Occupant::Instance(id),
                node: Node::Empty,
            });
        }
        Ok(())
    }

    /// Replace the output of the mount point `id`
    pub fn render(&self, region: &str, id: MountPointId, node: Node) -> Result<()> {
        let mut regions = self.write();
        let point = regions
            .get_mut(region)
            .and_then(|r| {
                r.points
                    .iter_mut()
                    .find(|point| matches!(point.occupant, Occupant::Instance(p) if p == id))
            })
            .ok_or_else(|| Error::mount_target_unavailable(format!("{region}/{id}")))?;
        point.node = node;
        Ok(())
    }

    /// Release the mount point `id`
    pub fn detach(&self, region: &str, id: MountPointId) -> bool {
        let mut regions = self.write();
        let Some(r) = regions.get_mut(region) else {
            return false;
        };
        let before = r.points.len();
        r.points
            .retain(|point| !matches!(point.occupant, Occupant::Instance(p) if p == id));
        before != r.points.len()
    }

    /// Show `node` in place of the failed module `key`
    pub fn show_fallback(&self, region: &str, key: &ModuleKey, node: Node) -> Result<()> {
        let mut regions = self.write();
        let points = &mut regions
            .get_mut(region)
            .ok_or_else(|| Error::mount_target_unavailable(region))?
            .points;
        match points
            .iter_mut()
            .find(|point| matches!(&point.occupant, Occupant::Fallback(k) if k == key))
        {
            Some(point) => point.node = node,
            None => points.push(MountPoint {
                occupant: Occupant::Fallback(key.clone()),
                node,
            }),
        }
        Ok(())
    }

    /// Remove the fallback shown for `key`
    pub fn clear_fallback(&self, region: &str, key: &ModuleKey) -> bool {
        let mut regions = self.write();
        let Some(r) = regions.get_mut(region) else {
            return false;
        };
        let before = r.points.len();
        r.points
            .retain(|point| !matches!(&point.occupant, Occupant::Fallback(k) if k == key));
        before != r.points.len()
    }

    /// Output of one mount point
    pub fn node(&self, region: &str, id: MountPointId) -> Option<Node> {
        self.read().get(region).and_then(|r| {
            r.points
                .iter()
                .find(|point| matches!(point.occupant, Occupant::Instance(p) if p == id))
                .map(|point| point.node.clone())
        })
    }

    /// Outputs of every mount point in a region, in attach order
    pub fn region_nodes(&self, region: &str) -> Result<Vec<Node>> {
        self.read()
            .get(region)
            .map(|r| r.points.iter().map(|point| point.node.clone()).collect())
            .ok_or_else(|| Error::mount_target_unavailable(region))
    }

    /// Text content of a region
    pub fn region_text(&self, region: &str) -> Result<String> {
        Ok(self
            .region_nodes(region)?
            .iter()
            .map(Node::text_content)
            .collect())
    }

    /// Markup of a region
    pub fn region_markup(&self, region: &str) -> Result<String> {
        Ok(Node::fragment(self.region_nodes(region)?).to_string())
    }

    /// Number of mount points in a region (fallbacks included)
    pub fn mount_count(&self, region: &str) -> usize {
        self.read().get(region).map_or(0, |r| r.points.len())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Region>> {
        self.regions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Region>> {
        self.regions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MountRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regions: BTreeMap<String, usize> = self
            .read()
            .iter()
            .map(|(name, region)| (name.clone(), region.points.len()))
            .collect();
        f.debug_struct("MountRegistry")
            .field("regions", &regions)
            .finish()
    }
}
