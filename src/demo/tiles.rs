// ============================================
// Demo Tiles - Процедурный атлас-полоса
// ============================================
// Горизонтальная полоса квадратных тайлов: тайл i занимает
// u в [i/count, (i+1)/count]. Пиксели рисуются процедурно.

/// Сторона одного тайла в пикселях
pub const TILE_SIZE: u32 = 16;

pub const TILE_GRASS: u8 = 0;
pub const TILE_STONE: u8 = 1;
pub const TILE_SAND: u8 = 2;
pub const TILE_WOOD: u8 = 3;
pub const TILE_WATER: u8 = 4;
pub const TILE_FOLIAGE: u8 = 5;

pub const TILE_COUNT: u32 = 6;

/// Собрать RGBA-полосу; возвращает (пиксели, ширина, высота)
pub fn build_strip() -> (Vec<u8>, u32, u32) {
    let width = TILE_SIZE * TILE_COUNT;
    let height = TILE_SIZE;
    let mut data = vec![0u8; (width * height * 4) as usize];

    for tile in 0..TILE_COUNT as u8 {
        paint_tile(&mut data, width, tile);
    }

    (data, width, height)
}

fn paint_tile(data: &mut [u8], atlas_width: u32, tile: u8) {
    let base_x = tile as u32 * TILE_SIZE;

    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            let rgba = match tile {
                TILE_GRASS => {
                    let n = simple_hash(x + base_x * 100, y);
                    if n > 140 {
                        [96, 164, 64, 255]
                    } else {
                        [72, 136, 48, 255]
                    }
                }

                TILE_STONE => {
                    let n = simple_hash(x + base_x * 100, y + 7);
                    if n > 128 {
                        [132, 132, 138, 255]
                    } else {
                        [106, 106, 112, 255]
                    }
                }

                TILE_SAND => {
                    let t = y as f32 / TILE_SIZE as f32;
                    lerp_color([222, 202, 152, 255], [198, 174, 124, 255], t)
                }

                TILE_WOOD => {
                    // Вертикальные доски со швом
                    let seam = x % 4 == 0;
                    let grain = simple_hash(x / 4, y) % 24;
                    if seam {
                        [94, 66, 40, 255]
                    } else {
                        [140 + grain, 100 + grain, 58, 255]
                    }
                }

                TILE_WATER => {
                    let ripple = simple_hash(x, y + base_x) % 20;
                    [40, 92 + ripple, 182, 140]
                }

                TILE_FOLIAGE => {
                    let n = simple_hash(x + base_x * 100, y + 13);
                    if n < 70 {
                        // Просветы между листьями
                        [0, 0, 0, 0]
                    } else if n > 170 {
                        [84, 150, 58, 255]
                    } else {
                        [58, 118, 40, 255]
                    }
                }

                _ => [255, 0, 255, 255],
            };

            set_pixel(data, atlas_width, base_x + x, y, rgba);
        }
    }
}

fn set_pixel(data: &mut [u8], atlas_width: u32, x: u32, y: u32, rgba: [u8; 4]) {
    let idx = ((y * atlas_width + x) * 4) as usize;
    if idx + 3 < data.len() {
        data[idx] = rgba[0];
        data[idx + 1] = rgba[1];
        data[idx + 2] = rgba[2];
        data[idx + 3] = rgba[3];
    }
}

/// Простой хеш для процедурных текстур
pub(crate) fn simple_hash(x: u32, y: u32) -> u8 {
    let n = x.wrapping_mul(374761393).wrapping_add(y.wrapping_mul(668265263));
    let n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    ((n ^ (n >> 16)) & 0xFF) as u8
}

/// Линейная интерполяция цветов
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    [
        (a[0] as f32 * (1.0 - t) + b[0] as f32 * t) as u8,
        (a[1] as f32 * (1.0 - t) + b[1] as f32 * t) as u8,
        (a[2] as f32 * (1.0 - t) + b[2] as f32 * t) as u8,
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_dimensions() {
        let (data, width, height) = build_strip();
        assert_eq!(width, TILE_SIZE * TILE_COUNT);
        assert_eq!(height, TILE_SIZE);
        assert_eq!(data.len(), (width * height * 4) as usize);
    }

    #[test]
    fn water_is_translucent() {
        let (data, width, _) = build_strip();
        let base_x = TILE_WATER as u32 * TILE_SIZE;
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                let idx = ((y * width + base_x + x) * 4 + 3) as usize;
                assert!(data[idx] < 255);
            }
        }
    }

    #[test]
    fn foliage_has_holes() {
        let (data, width, _) = build_strip();
        let base_x = TILE_FOLIAGE as u32 * TILE_SIZE;
        let mut holes = 0;
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                let idx = ((y * width + base_x + x) * 4 + 3) as usize;
                if data[idx] == 0 {
                    holes += 1;
                }
            }
        }
        assert!(holes > 0);
    }

    #[test]
    fn solid_tiles_are_opaque() {
        let (data, width, _) = build_strip();
        for tile in [TILE_GRASS, TILE_STONE, TILE_SAND, TILE_WOOD] {
            let base_x = tile as u32 * TILE_SIZE;
            for y in 0..TILE_SIZE {
                for x in 0..TILE_SIZE {
                    let idx = ((y * width + base_x + x) * 4 + 3) as usize;
                    assert_eq!(data[idx], 255);
                }
            }
        }
    }
}
