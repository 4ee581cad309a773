//! glTF scene loader.
//!
//! Builds a [`Scene`] from a `.gltf` / `.glb` file: node hierarchy, names,
//! local TRS and the materials referenced by each node's mesh primitives.
//! Geometry and textures are the renderer's business and are not read.
//!
//! Node names are sanitised the way web viewers do before they are used in
//! object paths: whitespace becomes `_` and the reserved characters
//! `[ ] . : /` are removed. Authored object ids refer to these names.

use std::path::Path;

use glam::{Quat, Vec3, Vec4};
use rustc_hash::FxHashMap;

use crate::errors::{Result, ViewerError};
use crate::scene::{Material, MaterialHandle, Node, NodeHandle, Scene};

pub struct GltfLoader<'a> {
    scene: &'a mut Scene,
    /// glTF material index -> scene material
    material_map: Vec<MaterialHandle>,
    /// Shared by every primitive without a material.
    default_material: Option<MaterialHandle>,
}

impl<'a> GltfLoader<'a> {
    /// Parses `path` and appends the default scene below `scene`'s model root.
    pub fn load(path: &Path, scene: &'a mut Scene) -> Result<usize> {
        let gltf = gltf::Gltf::open(path)?;

        let mut loader = Self {
            scene,
            material_map: Vec::with_capacity(gltf.materials().len()),
            default_material: None,
        };

        let required: Vec<_> = gltf.extensions_required().collect();
        if !required.is_empty() {
            log::warn!("glTF requires extensions {required:?}; only the node hierarchy is read");
        }

        loader.load_materials(&gltf);

        let Some(gltf_scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
            return Err(ViewerError::EmptyModel(path.display().to_string()));
        };
        if let Some(name) = gltf_scene.name() {
            loader.scene.name = sanitize_node_name(name).into();
        }

        let root = loader.scene.root();
        let mut created = 0;
        let mut node_mapping: FxHashMap<usize, NodeHandle> = FxHashMap::default();
        let mut stack: Vec<(gltf::Node<'_>, NodeHandle)> =
            gltf_scene.nodes().map(|n| (n, root)).collect();
        stack.reverse();

        while let Some((gltf_node, parent)) = stack.pop() {
            if node_mapping.contains_key(&gltf_node.index()) {
                log::warn!("glTF node {} is referenced twice, skipping", gltf_node.index());
                continue;
            }
            let handle = loader.create_node(&gltf_node, parent);
            node_mapping.insert(gltf_node.index(), handle);
            created += 1;

            let children: Vec<_> = gltf_node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, handle));
            }
        }

        log::info!("Loaded {created} nodes from {}", path.display());
        Ok(created)
    }

    fn load_materials(&mut self, gltf: &gltf::Gltf) {
        for material in gltf.materials() {
            let color = Vec4::from_array(material.pbr_metallic_roughness().base_color_factor());
            let mut engine_mat = Material::new(color)
                .with_blend(material.alpha_mode() == gltf::material::AlphaMode::Blend);
            if let Some(name) = material.name() {
                engine_mat = engine_mat.with_name(name.to_owned());
            }
            self.material_map.push(self.scene.add_material(engine_mat));
        }
    }

    fn default_material(&mut self) -> MaterialHandle {
        if let Some(handle) = self.default_material {
            return handle;
        }
        let handle = self
            .scene
            .add_material(Material::default().with_name("default"));
        self.default_material = Some(handle);
        handle
    }

    fn create_node(&mut self, gltf_node: &gltf::Node<'_>, parent: NodeHandle) -> NodeHandle {
        let mut node = match gltf_node.name() {
            Some(name) => Node::with_name(sanitize_node_name(name)),
            None => Node::new(),
        };

        let (t, r, s) = gltf_node.transform().decomposed();
        node.transform
            .set_pose(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s));

        if let Some(mesh) = gltf_node.mesh() {
            let mut materials = Vec::new();
            for primitive in mesh.primitives() {
                let mapped = primitive
                    .material()
                    .index()
                    .and_then(|index| self.material_map.get(index).copied());
                let handle = match mapped {
                    Some(handle) => handle,
                    None => self.default_material(),
                };
                if !materials.contains(&handle) {
                    materials.push(handle);
                }
            }
            node.materials = materials.into_iter().collect();
        }

        self.scene.add_to_parent(node, parent)
    }
}

/// Strips characters that cannot appear in an object path segment.
#[must_use]
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | '.' | ':' | '/'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
