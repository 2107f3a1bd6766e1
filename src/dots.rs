use crate::config::{SimulationConfig, Viewport};
use crate::random::Random;

/// One moving point, in canvas coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub speed: u32,
}

/// The dot population. Only ever replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct DotStore {
    dots: Vec<Dot>,
}

impl DotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throws away every dot and spawns `config.dot_count` new ones.
    pub fn regenerate(&mut self, config: &SimulationConfig, viewport: Viewport, random: &mut Random) {
        let r = config.point_radius;
        let (min_speed, max_speed) = config.speed_range;
        let min_dir = config.min_direction;

        // 前の世代は全部捨てる / The previous generation goes away entirely
        self.dots.clear();
        self.dots.reserve(config.dot_count);
        for _ in 0..config.dot_count {
            // 画面内のランダムな位置 / Random on-screen position, radius away from the edges
            let x = random.uniform_int(r, viewport.width - r) as f32;
            let y = random.uniform_int(r, viewport.height - r) as f32;

            // 0 に近すぎる方向は遅すぎるので固定値に寄せる
            // Directions too close to 0 crawl, so snap them. X snaps to +min, Y to -min.
            let mut dir_x = random.uniform_float(-1.0, 1.0);
            if dir_x.abs() < min_dir {
                dir_x = min_dir;
            }
            let mut dir_y = random.uniform_float(-1.0, 1.0);
            if dir_y.abs() < min_dir {
                dir_y = -min_dir;
            }

            // 点ごとの速さ（生成時に固定） / Per-dot speed, fixed for its lifetime
            let speed = random.uniform_int(min_speed as f32, max_speed as f32) as u32;
            self.dots.push(Dot {
                x,
                y,
                dir_x,
                dir_y,
                speed,
            });
        }
        tracing::debug!(count = self.dots.len(), "regenerated dots");
    }

    /// Re-rolls the coordinate of any dot past the far edge of the viewport.
    ///
    /// Only the upper bound is checked; a dot left of or above the canvas stays put.
    pub fn correct_out_of_bounds(&mut self, config: &SimulationConfig, viewport: Viewport, random: &mut Random) {
        let r = config.point_radius;
        let max_x = viewport.width - r;
        let max_y = viewport.height - r;
        let mut moved = 0usize;
        for dot in &mut self.dots {
            // 右端・下端を越えた軸だけ置き直す / Only the axis past the far edge is re-rolled
            if dot.x > max_x {
                dot.x = random.uniform_int(r, max_x) as f32;
                moved += 1;
            }
            if dot.y > max_y {
                dot.y = random.uniform_int(r, max_y) as f32;
                moved += 1;
            }
        }
        if moved > 0 {
            tracing::debug!(moved, "moved dots back inside the viewport");
        }
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dot> {
        self.dots.iter()
    }

    pub fn as_slice(&self) -> &[Dot] {
        &self.dots
    }

    pub fn as_mut_slice(&mut self) -> &mut [Dot] {
        &mut self.dots
    }
}

impl FromIterator<Dot> for DotStore {
    fn from_iter<I: IntoIterator<Item = Dot>>(iter: I) -> Self {
        Self {
            dots: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize) -> SimulationConfig {
        let mut config = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        config.dot_count = count;
        config
    }

    #[test]
    fn test_regenerate_respects_min_direction() {
        let config = config(500);
        let mut store = DotStore::new();
        store.regenerate(&config, Viewport::new(800.0, 600.0), &mut Random::from_seed(11));
        assert_eq!(store.len(), 500);
        for dot in store.iter() {
            assert!(dot.dir_x.abs() >= config.min_direction, "{dot:?}");
            assert!(dot.dir_y.abs() >= config.min_direction, "{dot:?}");
            assert!((-1.0..=1.0).contains(&dot.dir_x));
            assert!((-1.0..=1.0).contains(&dot.dir_y));
        }
    }

    #[test]
    fn test_regenerate_places_dots_inside_padding() {
        let config = config(500);
        let viewport = Viewport::new(320.0, 200.0);
        let mut store = DotStore::new();
        store.regenerate(&config, viewport, &mut Random::from_seed(5));
        let r = config.point_radius;
        for dot in store.iter() {
            assert!(dot.x >= r && dot.x <= viewport.width - r, "{dot:?}");
            assert!(dot.y >= r && dot.y <= viewport.height - r, "{dot:?}");
            assert!((10..=20).contains(&dot.speed));
        }
    }

    #[test]
    fn test_regenerate_replaces_whole_population() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut random = Random::from_seed(9);
        let mut store = DotStore::new();
        store.regenerate(&config(50), viewport, &mut random);
        let old: Vec<Dot> = store.iter().copied().collect();

        store.regenerate(&config(10), viewport, &mut random);
        assert_eq!(store.len(), 10);
        assert!(store.iter().all(|dot| !old.contains(dot)));
    }

    #[test]
    fn test_correct_out_of_bounds_only_fixes_upper_edge() {
        let config = config(3);
        let viewport = Viewport::new(100.0, 100.0);
        let dot = |x, y| Dot {
            x,
            y,
            dir_x: 1.0,
            dir_y: 1.0,
            speed: 10,
        };
        let mut store: DotStore = [dot(150.0, 50.0), dot(-20.0, -5.0), dot(50.0, 95.0)]
            .into_iter()
            .collect();

        store.correct_out_of_bounds(&config, viewport, &mut Random::from_seed(2));

        let dots = store.as_slice();
        assert!(dots[0].x >= 8.0 && dots[0].x <= 92.0);
        assert_eq!(dots[0].y, 50.0);
        assert_eq!((dots[1].x, dots[1].y), (-20.0, -5.0));
        assert_eq!(dots[2].x, 50.0);
        assert!(dots[2].y >= 8.0 && dots[2].y <= 92.0);
    }
}
