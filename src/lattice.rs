//! The grid of legal piece positions and its nearest-neighbour adjacency.
//!
//! Lattices are layered: a [`Lattice`] owns [`Layer`]s, a layer owns [`Row`]s
//! and a row owns [`Site`]s. Sites sit at integer coordinates equal to their
//! grid position (`x` column, `y` row, `z` layer). Children point back to their
//! parents by index, never by reference.

use crate::error::{GenerateError, Result};
use glam::IVec3;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

/// Grid position of a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl SiteId {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// Shape of the lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Extent {
    /// `z` layers of `y` rows with `x` sites each.
    Uniform { x: usize, y: usize, z: usize },
    /// Layer `z` is `(z + 1) × (z + 1)`; layer 0 is the apex.
    Pyramidal { layers: usize },
}

impl Default for Extent {
    fn default() -> Self {
        Self::Uniform { x: 5, y: 11, z: 1 }
    }
}

impl Extent {
    pub fn layers(&self) -> usize {
        match *self {
            Self::Uniform { z, .. } => z,
            Self::Pyramidal { layers } => layers,
        }
    }

    /// `(columns, rows)` of layer `z`.
    pub fn layer_extent(&self, z: usize) -> (usize, usize) {
        match *self {
            Self::Uniform { x, y, .. } => (x, y),
            Self::Pyramidal { .. } => (z + 1, z + 1),
        }
    }

    fn validate(&self) -> Result<()> {
        let empty = match *self {
            Self::Uniform { x, y, z } => x == 0 || y == 0 || z == 0,
            Self::Pyramidal { layers } => layers == 0,
        };
        if empty {
            return Err(GenerateError::InvalidExtent(format!("{self:?} has no sites")));
        }
        Ok(())
    }
}

/// A lattice position with its neighbour links.
///
/// `neighbors[i]` is reached from this site by moving along `links[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    neighbors: Vec<SiteId>,
    links: Vec<IVec3>,
}

/// Serialized form of one neighbour link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub to: SiteId,
    pub direction: IVec3,
}

impl Site {
    fn new(x: usize, y: usize, z: usize) -> Self {
        Self {
            x,
            y,
            z,
            neighbors: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn id(&self) -> SiteId {
        SiteId::new(self.x, self.y, self.z)
    }

    pub fn neighbors(&self) -> &[SiteId] {
        &self.neighbors
    }

    pub fn links(&self) -> &[IVec3] {
        &self.links
    }

    pub fn neighbor_links(&self) -> impl Iterator<Item = Neighbor> + '_ {
        self.neighbors
            .iter()
            .zip(&self.links)
            .map(|(&to, &direction)| Neighbor { to, direction })
    }

    fn add_neighbor(&mut self, to: SiteId, direction: IVec3) {
        self.neighbors.push(to);
        self.links.push(direction);
    }

    fn has_link(&self, to: SiteId, direction: IVec3) -> bool {
        self.neighbor_links()
            .any(|n| n.to == to && n.direction == direction)
    }
}

impl Serialize for Site {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Site", 4)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.serialize_field("z", &self.z)?;
        let neighbors: Vec<Neighbor> = self.neighbor_links().collect();
        state.serialize_field("neighbors", &neighbors)?;
        state.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Index of the owning layer.
    #[serde(skip)]
    pub layer: usize,
    #[serde(skip)]
    pub y: usize,
    pub sites: Vec<Site>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Layer {
    #[serde(skip)]
    pub z: usize,
    pub rows: Vec<Row>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Lattice {
    #[serde(skip)]
    extent: Extent,
    pub layers: Vec<Layer>,
}

impl Lattice {
    /// Creates all sites for `extent` and links nearest neighbours.
    ///
    /// Same-layer links go to the next row (`y + 1`) and next column (`x + 1`).
    /// Pyramids also link each site to the up to four sites below it in layer
    /// `z + 1`; their direction has `x`/`y` set to `-1` where the coordinate
    /// does not change and `z = 1`. Every link is stored on both ends with
    /// opposite directions, and the result is checked for one-sided links.
    pub fn build(extent: Extent) -> Result<Lattice> {
        extent.validate()?;

        let layers = (0..extent.layers())
            .map(|z| {
                let (columns, rows) = extent.layer_extent(z);
                Layer {
                    z,
                    rows: (0..rows)
                        .map(|y| Row {
                            layer: z,
                            y,
                            sites: (0..columns).map(|x| Site::new(x, y, z)).collect(),
                        })
                        .collect(),
                }
            })
            .collect();

        let mut lattice = Lattice { extent, layers };
        lattice.link_neighbors();
        lattice.check_symmetric()?;

        info!(
            layers = lattice.layers.len(),
            sites = lattice.site_count(),
            adjacencies = lattice.adjacency_count(),
            "lattice built"
        );
        Ok(lattice)
    }

    fn link_neighbors(&mut self) {
        let ids: Vec<SiteId> = self.sites().map(Site::id).collect();
        let pyramidal = matches!(self.extent, Extent::Pyramidal { .. });

        for id in ids {
            let SiteId { x, y, z } = id;

            // same layer
            let next_row = SiteId::new(x, y + 1, z);
            if self.site(next_row).is_some() {
                self.connect(id, next_row, IVec3::new(0, 1, 0));
            }
            let next_column = SiteId::new(x + 1, y, z);
            if self.site(next_column).is_some() {
                self.connect(id, next_column, IVec3::new(1, 0, 0));
            }

            if pyramidal {
                for dy in [0, 1] {
                    for dx in [0, 1] {
                        let lower = SiteId::new(x + dx, y + dy, z + 1);
                        if self.site(lower).is_none() {
                            continue;
                        }
                        let direction = IVec3::new(
                            if dx == 0 { -1 } else { 1 },
                            if dy == 0 { -1 } else { 1 },
                            1,
                        );
                        self.connect(id, lower, direction);
                    }
                }
            }
        }
        debug!(adjacencies = self.adjacency_count(), "linked lattice sites");
    }

    fn connect(&mut self, from: SiteId, to: SiteId, direction: IVec3) {
        if let Some(site) = self.site_mut(from) {
            site.add_neighbor(to, direction);
        }
        if let Some(site) = self.site_mut(to) {
            site.add_neighbor(from, -direction);
        }
    }

    /// Fails if any link lacks its reverse link on the neighbour.
    pub fn check_symmetric(&self) -> Result<()> {
        for site in self.sites() {
            for link in site.neighbor_links() {
                let reversed = self
                    .site(link.to)
                    .is_some_and(|n| n.has_link(site.id(), -link.direction));
                if !reversed {
                    return Err(GenerateError::AdjacencyAsymmetry {
                        from: site.id(),
                        to: link.to,
                        direction: link.direction,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.layers.get(id.z)?.rows.get(id.y)?.sites.get(id.x)
    }

    fn site_mut(&mut self, id: SiteId) -> Option<&mut Site> {
        self.layers
            .get_mut(id.z)?
            .rows
            .get_mut(id.y)?
            .sites
            .get_mut(id.x)
    }

    /// The row a site belongs to.
    pub fn row_of(&self, site: &Site) -> Option<&Row> {
        self.layers.get(site.z)?.rows.get(site.y)
    }

    /// The layer a row belongs to.
    pub fn layer_of(&self, row: &Row) -> Option<&Layer> {
        self.layers.get(row.layer)
    }

    /// All sites, layer by layer in row-major order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> + '_ {
        self.layers
            .iter()
            .flat_map(|layer| layer.rows.iter())
            .flat_map(|row| row.sites.iter())
    }

    pub fn site_count(&self) -> usize {
        self.sites().count()
    }

    /// Number of undirected adjacencies (each stored twice).
    pub fn adjacency_count(&self) -> usize {
        self.sites().map(|s| s.neighbors.len()).sum::<usize>() / 2
    }

    /// The neighbour reached from `id` by moving along `direction`, if linked.
    pub fn neighbor_towards(&self, id: SiteId, direction: IVec3) -> Option<SiteId> {
        let site = self.site(id)?;
        site.links
            .iter()
            .position(|&link| link == direction)
            .and_then(|i| site.neighbors.get(i).copied())
    }

    #[cfg(test)]
    fn drop_link(&mut self, id: SiteId, index: usize) {
        if let Some(site) = self.site_mut(id) {
            site.neighbors.remove(index);
            site.links.remove(index);
        }
    }
}
