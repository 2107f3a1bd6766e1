use crate::config::SimulationConfig;
use crate::dots::Dot;

/// A pair of dots close enough to be joined by a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// Half the Manhattan distance, not Euclidean.
pub fn link_distance(a: &Dot, b: &Dot) -> f32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) / 2.0
}

/// Line opacity for a link of length `distance`.
///
/// With dynamic alpha on, fades linearly from `max_alpha` at 0 to `min_alpha`
/// at the link threshold. Otherwise always `max_alpha`.
pub fn link_alpha(distance: f32, config: &SimulationConfig) -> f32 {
    if !config.dynamic_alpha {
        return config.max_alpha;
    }
    let threshold = config.link_distance;
    // 線形補間 / maps [threshold, 0] onto [min_alpha, max_alpha]
    config.min_alpha + (distance - threshold) * (config.max_alpha - config.min_alpha) / (0.0 - threshold)
}

/// Calls `f` once for every unordered pair within the link threshold.
///
/// Brute force over all pairs: `i < j`, so each line is produced once.
pub fn for_each_link(dots: &[Dot], config: &SimulationConfig, mut f: impl FnMut(Link)) {
    for (i, a) in dots.iter().enumerate() {
        // j > i だけを見るので各ペアは一度きり / Only j > i, so each pair comes up once
        for (j, b) in dots.iter().enumerate().skip(i + 1) {
            // 点同士の距離（マンハッタン距離の半分） / Distance between the two dots
            let distance = link_distance(a, b);

            // しきい値以内なら線を引く（ちょうど等しい場合も含む）
            // Within the threshold, boundary included, the pair gets a line.
            if distance <= config.link_distance {
                f(Link {
                    from: i,
                    to: j,
                    distance,
                    alpha: link_alpha(distance, config),
                });
            }
        }
    }
}

pub fn links(dots: &[Dot], config: &SimulationConfig) -> Vec<Link> {
    let mut out = Vec::new();
    for_each_link(dots, config, |link| out.push(link));
    out
}
