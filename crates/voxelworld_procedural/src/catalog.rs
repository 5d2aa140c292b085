//! # Block Catalog
//!
//! Maps block ids to colors, material groups and physical attributes.
//!
//! Terrain and meshing only consume the narrow [`BlockCatalog`] trait, so
//! the catalog is injected wherever it is needed and tests can swap in a
//! fake. [`BlockRegistry`] is the stock implementation, either built from
//! the default block set or loaded from TOML.
//!
//! ## TOML Format
//!
//! ```toml
//! [[block]]
//! id = 1
//! name = "Stone"
//! color = [128, 128, 128]
//! material_group = 0
//! category = "natural"
//!
//! [[material]]
//! group = 0
//! name = "natural_opaque"
//! ```

use crate::error::{ProceduralError, ProceduralResult};
use bytemuck::{Pod, Zeroable};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Block identifier. `0` is always air.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air (always ID 0).
    pub const EMPTY: Self = Self(0);

    /// Creates a new block ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw ID.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns true if this is air.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// 8-bit RGBA color, laid out for direct vertex upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Opaque white; the color of unknown blocks.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fallback color for a block name that was registered without one.
    #[must_use]
    pub fn fallback_for_name(name: &str) -> Self {
        match name {
            "Stone" => Self::rgb(128, 128, 128),
            "Grass" => Self::rgb(34, 139, 34),
            "Sand" => Self::rgb(238, 214, 175),
            "Dirt" => Self::rgb(139, 90, 43),
            _ => Self::WHITE,
        }
    }
}

/// Palette category used to group blocks in selection UIs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    /// Stone, dirt, sand, grass.
    #[default]
    Natural,
    /// Logs and planks.
    Wood,
    /// Bricks, concrete, cobblestone.
    Building,
    /// Wool and other colored blocks.
    Decorative,
    /// Glass, light sources.
    Special,
}

/// One registered block type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    /// Unique id (never 0).
    pub id: BlockId,
    /// Lookup key, e.g. `"Stone"`.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Flat-shading color.
    pub color: Rgba,
    /// Material group index. Negative values are treated as group 0.
    pub material_group: i32,
    /// Palette category.
    pub category: BlockCategory,
    /// Full-size block (`true`) or sub-block variant (`false`).
    pub is_large: bool,
    /// Light passes through.
    pub is_transparent: bool,
    /// Emitted light level, 0..=15.
    pub light_level: u8,
}

/// Render material bound to a material group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaterialDefinition {
    /// Material group index.
    pub group: u32,
    /// Material asset name handed to the renderer.
    pub name: String,
}

/// Read interface consumed by terrain generation and meshing.
///
/// Every lookup tolerates unknown ids and returns a documented default.
pub trait BlockCatalog: Send + Sync {
    /// Flat color of a block. White if unknown.
    fn color(&self, id: BlockId) -> Rgba;

    /// Material group of a block, clamped non-negative. 0 if unknown.
    fn material_group(&self, id: BlockId) -> u32;

    /// Whether the id has a definition.
    fn is_registered(&self, id: BlockId) -> bool;

    /// Looks up a block id by its name.
    fn id_by_name(&self, name: &str) -> Option<BlockId>;

    /// Material bound to a material group, if any.
    fn material_for_group(&self, _group: u32) -> Option<&str> {
        None
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Default [`BlockCatalog`] implementation.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: HashMap<BlockId, BlockDefinition>,
    name_to_id: HashMap<String, BlockId>,
    materials: BTreeMap<u32, String>,
}

impl BlockRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the stock block set.
    #[must_use]
    pub fn with_defaults() -> Self {
        use BlockCategory::{Building, Decorative, Natural, Special, Wood};

        let mut registry = Self::new();
        let mut next_id = 1u16;
        let mut add = |name: &str, display: &str, color: Rgba, category, group, large| {
            let def = BlockDefinition {
                id: BlockId::new(next_id),
                name: name.to_string(),
                display_name: display.to_string(),
                color,
                material_group: group,
                category,
                is_large: large,
                is_transparent: false,
                light_level: 0,
            };
            next_id += 1;
            registry.insert(def);
        };

        // Natural, group 0
        add("Stone", "Stone", Rgba::rgb(128, 128, 128), Natural, 0, true);
        add("Dirt", "Dirt", Rgba::rgb(139, 90, 43), Natural, 0, true);
        add("Sand", "Sand", Rgba::rgb(238, 214, 175), Natural, 0, true);
        add("Gravel", "Gravel", Rgba::rgb(136, 140, 141), Natural, 0, true);

        // Grass gets its own group for the top texture
        add("Grass", "Grass", Rgba::rgb(34, 139, 34), Natural, 1, true);

        add("Wood", "Wood Log", Rgba::rgb(160, 82, 45), Wood, 2, true);
        add("Planks", "Wood Planks", Rgba::rgb(222, 184, 135), Wood, 2, true);

        add("Cobblestone", "Cobblestone", Rgba::rgb(100, 100, 100), Building, 3, true);
        add("Brick", "Brick", Rgba::rgb(178, 34, 34), Building, 3, true);
        add("StoneBrick", "Stone Brick", Rgba::rgb(120, 120, 120), Building, 3, true);
        add("Concrete", "Concrete", Rgba::rgb(180, 180, 180), Building, 3, true);

        add("Wool_White", "White Wool", Rgba::rgb(255, 255, 255), Decorative, 4, true);
        add("Wool_Red", "Red Wool", Rgba::rgb(200, 50, 50), Decorative, 4, true);
        add("Wool_Blue", "Blue Wool", Rgba::rgb(50, 50, 200), Decorative, 4, true);
        add("Wool_Green", "Green Wool", Rgba::rgb(50, 200, 50), Decorative, 4, true);

        add("Glass", "Glass", Rgba::rgb(200, 220, 255), Special, 5, true);
        add("Glowstone", "Glowstone", Rgba::rgb(255, 230, 150), Special, 5, true);

        // Sub-block variants share their parent's material group
        add("Stone_Small", "Stone (Small)", Rgba::rgb(128, 128, 128), Natural, 0, false);
        add("Brick_Small", "Brick (Small)", Rgba::rgb(178, 34, 34), Building, 3, false);
        add("Planks_Small", "Planks (Small)", Rgba::rgb(222, 184, 135), Wood, 2, false);
        add("Cobblestone_Small", "Cobblestone (Small)", Rgba::rgb(100, 100, 100), Building, 3, false);
        add("Concrete_Small", "Concrete (Small)", Rgba::rgb(180, 180, 180), Building, 3, false);

        for (group, material) in ["natural", "grass", "wood", "building", "decorative", "special"]
            .into_iter()
            .enumerate()
        {
            registry.register_material(group as u32, material);
        }

        if let Some(glass) = registry.get_by_name_mut("Glass") {
            glass.is_transparent = true;
        }
        if let Some(glowstone) = registry.get_by_name_mut("Glowstone") {
            glowstone.light_level = 15;
        }

        tracing::debug!("Block registry initialized with {} default blocks", registry.len());
        registry
    }

    /// Parses a registry from TOML `[[block]]` and `[[material]]` tables.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, a block using id 0, or two
    /// blocks sharing an id.
    pub fn from_toml_str(source: &str) -> ProceduralResult<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        let mut registry = Self::new();

        for entry in file.block {
            if entry.id.is_empty() {
                return Err(ProceduralError::ReservedBlockId(entry.name));
            }
            if let Some(existing) = registry.blocks.get(&entry.id) {
                return Err(ProceduralError::DuplicateBlockId {
                    id: entry.id.raw(),
                    first: existing.name.clone(),
                    second: entry.name,
                });
            }
            registry.insert(entry.into_definition());
        }
        for material in file.material {
            registry.register_material(material.group, &material.name);
        }

        tracing::info!(
            "Loaded block catalog: {} blocks, {} materials",
            registry.len(),
            registry.materials.len()
        );
        Ok(registry)
    }

    /// Adds or replaces a block definition.
    pub fn insert(&mut self, def: BlockDefinition) {
        if let Some(old) = self.blocks.get(&def.id) {
            self.name_to_id.remove(&old.name);
        }
        self.name_to_id.insert(def.name.clone(), def.id);
        self.blocks.insert(def.id, def);
    }

    /// Binds a render material to a material group.
    pub fn register_material(&mut self, group: u32, name: &str) {
        self.materials.insert(group, name.to_string());
    }

    /// Gets a definition by id.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.blocks.get(&id)
    }

    /// Gets a definition by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&BlockDefinition> {
        self.name_to_id.get(name).and_then(|id| self.blocks.get(id))
    }

    fn get_by_name_mut(&mut self, name: &str) -> Option<&mut BlockDefinition> {
        let id = *self.name_to_id.get(name)?;
        self.blocks.get_mut(&id)
    }

    /// Number of registered blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if no blocks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks of a category, ordered by id.
    #[must_use]
    pub fn blocks_by_category(&self, category: BlockCategory) -> Vec<&BlockDefinition> {
        self.sorted_where(|def| def.category == category)
    }

    /// All full-size blocks, ordered by id.
    #[must_use]
    pub fn large_blocks(&self) -> Vec<&BlockDefinition> {
        self.sorted_where(|def| def.is_large)
    }

    /// All sub-block variants, ordered by id.
    #[must_use]
    pub fn small_blocks(&self) -> Vec<&BlockDefinition> {
        self.sorted_where(|def| !def.is_large)
    }

    /// Distinct material groups in use, ascending.
    #[must_use]
    pub fn material_groups(&self) -> Vec<u32> {
        let groups: BTreeSet<u32> = self
            .blocks
            .values()
            .map(|def| clamp_group(def.material_group))
            .collect();
        groups.into_iter().collect()
    }

    fn sorted_where(&self, pred: impl Fn(&BlockDefinition) -> bool) -> Vec<&BlockDefinition> {
        let mut defs: Vec<_> = self.blocks.values().filter(|def| pred(def)).collect();
        defs.sort_by_key(|def| def.id);
        defs
    }
}

impl BlockCatalog for BlockRegistry {
    fn color(&self, id: BlockId) -> Rgba {
        self.blocks.get(&id).map_or(Rgba::WHITE, |def| def.color)
    }

    fn material_group(&self, id: BlockId) -> u32 {
        self.blocks
            .get(&id)
            .map_or(0, |def| clamp_group(def.material_group))
    }

    fn is_registered(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    fn material_for_group(&self, group: u32) -> Option<&str> {
        self.materials.get(&group).map(String::as_str)
    }
}

#[inline]
fn clamp_group(group: i32) -> u32 {
    u32::try_from(group).unwrap_or(0)
}

// =============================================================================
// TOML SCHEMA
// =============================================================================

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    block: Vec<BlockEntry>,
    #[serde(default)]
    material: Vec<MaterialDefinition>,
}

#[derive(Deserialize)]
struct BlockEntry {
    id: BlockId,
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    color: Option<[u8; 3]>,
    #[serde(default)]
    material_group: i32,
    #[serde(default)]
    category: BlockCategory,
    #[serde(default = "default_true")]
    large: bool,
    #[serde(default)]
    transparent: bool,
    #[serde(default)]
    light_level: u8,
}

fn default_true() -> bool {
    true
}

impl BlockEntry {
    fn into_definition(self) -> BlockDefinition {
        let color = self
            .color
            .map_or_else(|| Rgba::fallback_for_name(&self.name), |[r, g, b]| Rgba::rgb(r, g, b));
        BlockDefinition {
            id: self.id,
            display_name: self.display_name.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            color,
            material_group: self.material_group,
            category: self.category,
            is_large: self.large,
            is_transparent: self.transparent,
            light_level: self.light_level.min(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_registered() {
        let registry = BlockRegistry::with_defaults();
        assert_eq!(registry.len(), 22);

        let stone = registry.id_by_name("Stone").unwrap();
        assert_eq!(registry.color(stone), Rgba::rgb(128, 128, 128));
        assert_eq!(registry.material_group(stone), 0);

        let grass = registry.id_by_name("Grass").unwrap();
        assert_eq!(registry.material_group(grass), 1);
    }

    #[test]
    fn test_unknown_block_defaults() {
        let registry = BlockRegistry::with_defaults();
        let unknown = BlockId::new(9999);

        assert!(!registry.is_registered(unknown));
        assert_eq!(registry.color(unknown), Rgba::WHITE);
        assert_eq!(registry.material_group(unknown), 0);
    }

    #[test]
    fn test_negative_group_clamped() {
        let mut registry = BlockRegistry::new();
        registry.insert(BlockDefinition {
            id: BlockId::new(3),
            name: "Odd".into(),
            display_name: "Odd".into(),
            color: Rgba::WHITE,
            material_group: -4,
            category: BlockCategory::Special,
            is_large: true,
            is_transparent: false,
            light_level: 0,
        });
        assert_eq!(registry.material_group(BlockId::new(3)), 0);
    }

    #[test]
    fn test_special_flags() {
        let registry = BlockRegistry::with_defaults();
        assert!(registry.get_by_name("Glass").unwrap().is_transparent);
        assert_eq!(registry.get_by_name("Glowstone").unwrap().light_level, 15);
    }

    #[test]
    fn test_material_groups_sorted_unique() {
        let registry = BlockRegistry::with_defaults();
        assert_eq!(registry.material_groups(), vec![0, 1, 2, 3, 4, 5]);
        for group in registry.material_groups() {
            assert!(registry.material_for_group(group).is_some());
        }
    }

    #[test]
    fn test_size_queries() {
        let registry = BlockRegistry::with_defaults();
        assert_eq!(registry.small_blocks().len(), 5);
        assert_eq!(registry.large_blocks().len(), 17);
        assert_eq!(registry.blocks_by_category(BlockCategory::Decorative).len(), 4);
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            [[block]]
            id = 1
            name = "Stone"
            material_group = 0

            [[block]]
            id = 7
            name = "Marble"
            color = [240, 240, 235]
            material_group = 2
            category = "building"
            large = false

            [[material]]
            group = 2
            name = "polished"
        "#;
        let registry = BlockRegistry::from_toml_str(source).unwrap();

        // Missing color falls back by name
        assert_eq!(registry.color(BlockId::new(1)), Rgba::rgb(128, 128, 128));
        assert_eq!(registry.color(BlockId::new(7)), Rgba::rgb(240, 240, 235));
        assert!(!registry.get(BlockId::new(7)).unwrap().is_large);
        assert_eq!(registry.material_for_group(2), Some("polished"));
        assert_eq!(registry.material_for_group(0), None);
    }

    #[test]
    fn test_from_toml_rejects_air_and_duplicates() {
        let air = "[[block]]\nid = 0\nname = \"Void\"\n";
        assert_eq!(
            BlockRegistry::from_toml_str(air).unwrap_err(),
            ProceduralError::ReservedBlockId("Void".into())
        );

        let dup = "[[block]]\nid = 2\nname = \"A\"\n[[block]]\nid = 2\nname = \"B\"\n";
        assert!(matches!(
            BlockRegistry::from_toml_str(dup),
            Err(ProceduralError::DuplicateBlockId { id: 2, .. })
        ));
    }

    #[test]
    fn test_from_toml_malformed() {
        assert!(matches!(
            BlockRegistry::from_toml_str("[[block]]\nid = \"x\""),
            Err(ProceduralError::CatalogParse(_))
        ));
    }
}
