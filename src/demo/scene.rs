// ============================================
// Demo Scene - Тестовый мир
// ============================================
// Плита пола с прудом, каменный шар, деревянный столб.
// Для каждой видимой грани считается пер-вершинное AO по трём
// соседям. Пруд пересекает границу чанков, чтобы пер-чанковый
// offset было видно в деле.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use super::tiles::{
    simple_hash, TILE_FOLIAGE, TILE_GRASS, TILE_SAND, TILE_STONE, TILE_WATER, TILE_WOOD,
};
use crate::mesh::{ChunkKey, ChunkMeshData, CHUNK_SIZE};
use crate::models::{ModelInstance, ModelVertex};

const FLOOR_SIZE: i32 = 64;
const FLOOR_HEIGHT: i32 = 4;

const POND_X: Range<i32> = 28..38;
const POND_Z: Range<i32> = 18..26;

const BALL_CENTER: [f32; 3] = [16.0, 8.0, 16.0];
const BALL_RADIUS: f32 = 4.6;

const PILLAR_X: i32 = 40;
const PILLAR_Z: i32 = 12;
const PILLAR_TOP: i32 = 12;

const SAND_CENTER: (i32, i32) = (50, 50);
const SAND_RADIUS: i32 = 8;

/// Столбики по углам пруда
const POST_CELLS: [(i32, i32); 4] = [(27, 17), (38, 17), (27, 26), (38, 26)];

/// Уровни затенения: 0 - самый тёмный угол, 3 - открытый
const AO_LEVELS: [u8; 4] = [100, 150, 200, 255];

/// Готовая сцена: чанковые меши плюс инстансы моделей
pub struct DemoScene {
    pub chunks: Vec<ChunkMeshData>,
    pub plants: Vec<ModelInstance>,
    pub posts: Vec<ModelInstance>,
}

pub fn build() -> DemoScene {
    let world = World::build();
    DemoScene {
        chunks: build_chunk_meshes(&world),
        plants: plant_instances(&world),
        posts: post_instances(),
    }
}

// ============================================
// Занятость мира
// ============================================

struct World {
    /// Непрозрачные блоки: ячейка -> тайл
    solid: HashMap<(i32, i32, i32), u8>,
    water: HashSet<(i32, i32, i32)>,
}

impl World {
    fn build() -> Self {
        let mut solid = HashMap::new();
        let mut water = HashSet::new();

        // Плита пола, верхний слой в области пруда заменён водой
        for x in 0..FLOOR_SIZE {
            for z in 0..FLOOR_SIZE {
                for y in 0..FLOOR_HEIGHT {
                    let in_pond =
                        y == FLOOR_HEIGHT - 1 && POND_X.contains(&x) && POND_Z.contains(&z);
                    if in_pond {
                        water.insert((x, y, z));
                        continue;
                    }
                    let tile = if y == FLOOR_HEIGHT - 1 {
                        surface_tile(x, z)
                    } else {
                        TILE_STONE
                    };
                    solid.insert((x, y, z), tile);
                }
            }
        }

        // Каменный шар на полу
        for y in FLOOR_HEIGHT..14 {
            for x in 10..23 {
                for z in 10..23 {
                    let dx = x as f32 + 0.5 - BALL_CENTER[0];
                    let dy = y as f32 + 0.5 - BALL_CENTER[1];
                    let dz = z as f32 + 0.5 - BALL_CENTER[2];
                    if dx * dx + dy * dy + dz * dz < BALL_RADIUS * BALL_RADIUS {
                        solid.insert((x, y, z), TILE_STONE);
                    }
                }
            }
        }

        // Деревянный столб
        for y in FLOOR_HEIGHT..PILLAR_TOP {
            solid.insert((PILLAR_X, y, PILLAR_Z), TILE_WOOD);
        }

        Self { solid, water }
    }

    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.solid.contains_key(&(x, y, z))
    }

    fn is_water(&self, x: i32, y: i32, z: i32) -> bool {
        self.water.contains(&(x, y, z))
    }
}

fn surface_tile(x: i32, z: i32) -> u8 {
    let dx = x - SAND_CENTER.0;
    let dz = z - SAND_CENTER.1;
    if dx * dx + dz * dz < SAND_RADIUS * SAND_RADIUS {
        TILE_SAND
    } else {
        TILE_GRASS
    }
}

// ============================================
// Грани куба
// ============================================

struct Face {
    normal: [i8; 3],
    /// 4 угла CCW при взгляде снаружи
    corners: [[u8; 3]; 4],
}

const FACES: [Face; 6] = [
    Face {
        normal: [1, 0, 0],
        corners: [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]],
    },
    Face {
        normal: [-1, 0, 0],
        corners: [[0, 0, 1], [0, 1, 1], [0, 1, 0], [0, 0, 0]],
    },
    Face {
        normal: [0, 1, 0],
        corners: [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]],
    },
    Face {
        normal: [0, -1, 0],
        corners: [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
    },
    Face {
        normal: [0, 0, 1],
        corners: [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]],
    },
    Face {
        normal: [0, 0, -1],
        corners: [[1, 0, 0], [0, 0, 0], [0, 1, 0], [1, 1, 0]],
    },
];

/// AO вершины по двум боковым соседям и диагональному
fn vertex_ao(side1: bool, side2: bool, corner: bool) -> u8 {
    let level = if side1 && side2 {
        0
    } else {
        3 - (side1 as u8 + side2 as u8 + corner as u8)
    };
    AO_LEVELS[level as usize]
}

/// AO четырёх углов грани. Соседи сэмплируются в плоскости
/// грани, на шаг наружу вдоль нормали.
fn face_ao(world: &World, x: i32, y: i32, z: i32, face: &Face) -> [u8; 4] {
    let n = face.normal;
    let axis = if n[0] != 0 {
        0
    } else if n[1] != 0 {
        1
    } else {
        2
    };
    let (u_axis, v_axis) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let base = [x + n[0] as i32, y + n[1] as i32, z + n[2] as i32];

    let mut out = [255u8; 4];
    for (i, corner) in face.corners.iter().enumerate() {
        let su: i32 = if corner[u_axis] == 1 { 1 } else { -1 };
        let sv: i32 = if corner[v_axis] == 1 { 1 } else { -1 };

        let mut side1 = base;
        side1[u_axis] += su;
        let mut side2 = base;
        side2[v_axis] += sv;
        let mut diag = base;
        diag[u_axis] += su;
        diag[v_axis] += sv;

        out[i] = vertex_ao(
            world.is_solid(side1[0], side1[1], side1[2]),
            world.is_solid(side2[0], side2[1], side2[2]),
            world.is_solid(diag[0], diag[1], diag[2]),
        );
    }
    out
}

// ============================================
// Сборка чанковых мешей
// ============================================

fn chunk_key_of(x: i32, y: i32, z: i32) -> ChunkKey {
    ChunkKey::new(
        x.div_euclid(CHUNK_SIZE),
        y.div_euclid(CHUNK_SIZE),
        z.div_euclid(CHUNK_SIZE),
    )
}

fn local_corners(x: i32, y: i32, z: i32, key: &ChunkKey, face: &Face) -> [[u8; 3]; 4] {
    let lx = (x - key.x * CHUNK_SIZE) as u8;
    let ly = (y - key.y * CHUNK_SIZE) as u8;
    let lz = (z - key.z * CHUNK_SIZE) as u8;
    face.corners
        .map(|c| [lx + c[0], ly + c[1], lz + c[2]])
}

fn build_chunk_meshes(world: &World) -> Vec<ChunkMeshData> {
    let mut chunks: HashMap<ChunkKey, ChunkMeshData> = HashMap::new();

    for (&(x, y, z), &tile) in &world.solid {
        let key = chunk_key_of(x, y, z);
        for face in &FACES {
            let nx = x + face.normal[0] as i32;
            let ny = y + face.normal[1] as i32;
            let nz = z + face.normal[2] as i32;
            // Вода не закрывает камень
            if world.is_solid(nx, ny, nz) {
                continue;
            }

            let ao = face_ao(world, x, y, z, face);
            let corners = local_corners(x, y, z, &key, face);
            chunks
                .entry(key)
                .or_insert_with(|| ChunkMeshData::new(key))
                .solid
                .push_quad(corners, ao, face.normal, tile);
        }
    }

    for &(x, y, z) in &world.water {
        let key = chunk_key_of(x, y, z);
        for face in &FACES {
            let nx = x + face.normal[0] as i32;
            let ny = y + face.normal[1] as i32;
            let nz = z + face.normal[2] as i32;
            if world.is_solid(nx, ny, nz) || world.is_water(nx, ny, nz) {
                continue;
            }

            // Поверхность воды без затенения
            let corners = local_corners(x, y, z, &key, face);
            chunks
                .entry(key)
                .or_insert_with(|| ChunkMeshData::new(key))
                .porous
                .push_quad(corners, [255; 4], face.normal, TILE_WATER);
        }
    }

    let mut list: Vec<ChunkMeshData> = chunks.into_values().collect();
    list.sort_by_key(|c| (c.key.x, c.key.y, c.key.z));
    list
}

// ============================================
// Блок-модели
// ============================================

/// Крест из двух диагональных плоскостей (растение).
/// Каждая плоскость индексируется в обе стороны, чтобы быть
/// видимой при включённом culling.
pub fn cross_model() -> (Vec<ModelVertex>, Vec<u32>) {
    let quads = [
        [
            [0.1, 0.0, 0.1],
            [0.9, 0.0, 0.9],
            [0.9, 1.0, 0.9],
            [0.1, 1.0, 0.1],
        ],
        [
            [0.9, 0.0, 0.1],
            [0.1, 0.0, 0.9],
            [0.1, 1.0, 0.9],
            [0.9, 1.0, 0.1],
        ],
    ];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(8);
    let mut indices = Vec::with_capacity(24);

    for quad in &quads {
        let base = vertices.len() as u32;
        for (corner, uv) in quad.iter().zip(uvs.iter()) {
            vertices.push(ModelVertex::new(*corner, [0.0, 1.0, 0.0], *uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    (vertices, indices)
}

/// Тонкий столбик: коробка выше блока
pub fn post_model() -> (Vec<ModelVertex>, Vec<u32>) {
    let min = [0.35, 0.0, 0.35];
    let max = [0.65, 1.2, 0.65];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for face in &FACES {
        let base = vertices.len() as u32;
        for (corner, uv) in face.corners.iter().zip(uvs.iter()) {
            let position = [
                if corner[0] == 1 { max[0] } else { min[0] },
                if corner[1] == 1 { max[1] } else { min[1] },
                if corner[2] == 1 { max[2] } else { min[2] },
            ];
            let normal = [
                face.normal[0] as f32,
                face.normal[1] as f32,
                face.normal[2] as f32,
            ];
            vertices.push(ModelVertex::new(position, normal, *uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

fn plant_instances(world: &World) -> Vec<ModelInstance> {
    let mut instances = Vec::new();

    for x in 0..FLOOR_SIZE {
        for z in 0..FLOOR_SIZE {
            // Только на траве, не внутри шара/столба/столбиков
            let on_grass = world.solid.get(&(x, FLOOR_HEIGHT - 1, z)) == Some(&TILE_GRASS);
            let open_above = !world.is_solid(x, FLOOR_HEIGHT, z);
            let post_here = POST_CELLS.contains(&(x, z));
            if !on_grass || !open_above || post_here {
                continue;
            }
            if simple_hash(x as u32, z as u32) >= 18 {
                continue;
            }

            let t = simple_hash(x as u32 * 5, z as u32 * 3) as f32 / 255.0;
            let tint = [0.8 + 0.2 * t, 1.0, 0.8 + 0.2 * (1.0 - t)];
            instances.push(ModelInstance::with_tint(
                [x as f32, FLOOR_HEIGHT as f32, z as f32],
                TILE_FOLIAGE as u32,
                tint,
            ));
        }
    }

    instances
}

fn post_instances() -> Vec<ModelInstance> {
    POST_CELLS
        .iter()
        .map(|&(x, z)| ModelInstance::new([x as f32, FLOOR_HEIGHT as f32, z as f32], TILE_WOOD as u32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_covers_four_chunks() {
        let scene = build();
        let keys: Vec<(i32, i32, i32)> = scene
            .chunks
            .iter()
            .map(|c| (c.key.x, c.key.y, c.key.z))
            .collect();
        assert_eq!(keys, vec![(0, 0, 0), (0, 0, 1), (1, 0, 0), (1, 0, 1)]);
        assert!(scene.chunks.iter().all(|c| !c.solid.is_empty()));
    }

    #[test]
    fn pond_spans_chunk_boundary() {
        let scene = build();
        let porous_keys: Vec<(i32, i32, i32)> = scene
            .chunks
            .iter()
            .filter(|c| !c.porous.is_empty())
            .map(|c| (c.key.x, c.key.y, c.key.z))
            .collect();
        assert_eq!(porous_keys, vec![(0, 0, 0), (1, 0, 0)]);
    }

    #[test]
    fn local_positions_fit_in_chunk() {
        let scene = build();
        for chunk in &scene.chunks {
            for vertex in chunk.solid.vertices.iter().chain(chunk.porous.vertices.iter()) {
                for &c in &vertex.position {
                    assert!(c as i32 <= CHUNK_SIZE);
                }
            }
        }
    }

    #[test]
    fn buried_faces_are_culled() {
        let world = World::build();
        let chunks = build_chunk_meshes(&world);
        let quads: usize = chunks.iter().map(|c| c.solid.indices.len() / 6).sum();
        // Грубая верхняя граница: все грани всех блоков
        assert!(quads < world.solid.len() * 6 / 2);
        assert!(quads > 0);
    }

    #[test]
    fn ao_levels() {
        assert_eq!(vertex_ao(false, false, false), 255);
        assert_eq!(vertex_ao(false, false, true), 200);
        assert_eq!(vertex_ao(true, false, false), 200);
        assert_eq!(vertex_ao(true, false, true), 150);
        // Оба боковых соседа закрыты: угол не важен
        assert_eq!(vertex_ao(true, true, false), 100);
        assert_eq!(vertex_ao(true, true, true), 100);
    }

    #[test]
    fn pillar_base_corner_is_darkened() {
        let world = World::build();
        // Верхняя грань блока пола рядом со столбом
        let face = &FACES[2];
        let ao = face_ao(&world, PILLAR_X + 1, FLOOR_HEIGHT - 1, PILLAR_Z, face);
        // Углы, примыкающие к столбу, темнее открытых
        assert!(ao.iter().any(|&a| a < 255));
        assert!(ao.iter().any(|&a| a == 255));
    }

    #[test]
    fn surface_tiles() {
        let world = World::build();
        assert_eq!(world.solid.get(&(0, FLOOR_HEIGHT - 1, 0)), Some(&TILE_GRASS));
        assert_eq!(
            world.solid.get(&(SAND_CENTER.0, FLOOR_HEIGHT - 1, SAND_CENTER.1)),
            Some(&TILE_SAND)
        );
        assert_eq!(world.solid.get(&(0, 0, 0)), Some(&TILE_STONE));
        assert!(world.is_water(30, FLOOR_HEIGHT - 1, 20));
    }

    #[test]
    fn models_are_well_formed() {
        let (cross_verts, cross_idx) = cross_model();
        assert_eq!(cross_verts.len(), 8);
        assert_eq!(cross_idx.len(), 24);
        assert!(cross_idx.iter().all(|&i| (i as usize) < cross_verts.len()));

        let (post_verts, post_idx) = post_model();
        assert_eq!(post_verts.len(), 24);
        assert_eq!(post_idx.len(), 36);
        assert!(post_idx.iter().all(|&i| (i as usize) < post_verts.len()));
    }

    #[test]
    fn posts_stand_on_solid_ground() {
        let world = World::build();
        for &(x, z) in &POST_CELLS {
            assert!(world.is_solid(x, FLOOR_HEIGHT - 1, z));
            assert!(!world.is_water(x, FLOOR_HEIGHT - 1, z));
        }
    }

    #[test]
    fn plants_avoid_water_and_posts() {
        let scene = build();
        assert!(!scene.plants.is_empty());
        for plant in &scene.plants {
            let x = plant.offset[0] as i32;
            let z = plant.offset[2] as i32;
            assert!(!(POND_X.contains(&x) && POND_Z.contains(&z)));
            assert!(!POST_CELLS.contains(&(x, z)));
        }
    }
}
