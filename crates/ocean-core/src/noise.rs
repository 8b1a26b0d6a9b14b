//! Host mirror of the 3D gradient noise used by `surface.wgsl`.
//!
//! Same lattice hashing (permutation polynomial mod 289) and gradient layout
//! as the shader, so CPU-side height queries agree with what the GPU draws.

use glam::{Vec3, Vec4};

#[inline]
fn mod289(x: Vec4) -> Vec4 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn mod289_3(x: Vec3) -> Vec3 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn permute(x: Vec4) -> Vec4 {
    mod289((x * 34.0 + Vec4::ONE) * x)
}

#[inline]
fn taylor_inv_sqrt(r: Vec4) -> Vec4 {
    Vec4::splat(1.792_842_9) - r * 0.853_734_7
}

#[inline]
fn fade(t: Vec3) -> Vec3 {
    t * t * t * (t * (t * 6.0 - Vec3::splat(15.0)) + Vec3::splat(10.0))
}

#[inline]
fn fract4(v: Vec4) -> Vec4 {
    v - v.floor()
}

// GLSL step(edge, x): 0 when x < edge, else 1
#[inline]
fn step4(edge: Vec4, x: Vec4) -> Vec4 {
    Vec4::new(
        if x.x < edge.x { 0.0 } else { 1.0 },
        if x.y < edge.y { 0.0 } else { 1.0 },
        if x.z < edge.z { 0.0 } else { 1.0 },
        if x.w < edge.w { 0.0 } else { 1.0 },
    )
}

fn gradients(ixy: Vec4) -> [Vec3; 4] {
    let gx = ixy / 7.0;
    let gy = fract4(gx.floor() / 7.0) - Vec4::splat(0.5);
    let mut gx = fract4(gx);
    let mut gy = gy;
    let gz = Vec4::splat(0.5) - gx.abs() - gy.abs();
    let sz = step4(gz, Vec4::ZERO);
    gx -= sz * (step4(Vec4::ZERO, gx) - Vec4::splat(0.5));
    gy -= sz * (step4(Vec4::ZERO, gy) - Vec4::splat(0.5));
    let g = [
        Vec3::new(gx.x, gy.x, gz.x),
        Vec3::new(gx.y, gy.y, gz.y),
        Vec3::new(gx.z, gy.z, gz.z),
        Vec3::new(gx.w, gy.w, gz.w),
    ];
    // each gradient scaled by its own inverse length (shader packs 00, 01, 10, 11)
    let norm = taylor_inv_sqrt(Vec4::new(
        g[0].dot(g[0]),
        g[2].dot(g[2]),
        g[1].dot(g[1]),
        g[3].dot(g[3]),
    ));
    [g[0] * norm.x, g[1] * norm.z, g[2] * norm.y, g[3] * norm.w]
}

/// Classic 3D gradient noise, roughly in \[-1, 1\]. Zero on integer lattice points.
pub fn classic_noise(p: Vec3) -> f32 {
    let pi0 = mod289_3(p.floor());
    let pi1 = mod289_3(p.floor() + Vec3::ONE);
    let pf0 = p - p.floor();
    let pf1 = pf0 - Vec3::ONE;

    let ix = Vec4::new(pi0.x, pi1.x, pi0.x, pi1.x);
    let iy = Vec4::new(pi0.y, pi0.y, pi1.y, pi1.y);
    let iz0 = Vec4::splat(pi0.z);
    let iz1 = Vec4::splat(pi1.z);

    let ixy = permute(permute(ix) + iy);
    let [g000, g100, g010, g110] = gradients(permute(ixy + iz0));
    let [g001, g101, g011, g111] = gradients(permute(ixy + iz1));

    let n000 = g000.dot(pf0);
    let n100 = g100.dot(Vec3::new(pf1.x, pf0.y, pf0.z));
    let n010 = g010.dot(Vec3::new(pf0.x, pf1.y, pf0.z));
    let n110 = g110.dot(Vec3::new(pf1.x, pf1.y, pf0.z));
    let n001 = g001.dot(Vec3::new(pf0.x, pf0.y, pf1.z));
    let n101 = g101.dot(Vec3::new(pf1.x, pf0.y, pf1.z));
    let n011 = g011.dot(Vec3::new(pf0.x, pf1.y, pf1.z));
    let n111 = g111.dot(pf1);

    let f = fade(pf0);
    let n_z = Vec4::new(n000, n100, n010, n110).lerp(Vec4::new(n001, n101, n011, n111), f.z);
    let n_y0 = n_z.x + (n_z.z - n_z.x) * f.y;
    let n_y1 = n_z.y + (n_z.w - n_z.y) * f.y;
    2.2 * (n_y0 + (n_y1 - n_y0) * f.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanishes_on_lattice_points() {
        for (x, y, z) in [(0.0, 0.0, 0.0), (3.0, -2.0, 7.0), (-5.0, 11.0, 1.0)] {
            assert!(classic_noise(Vec3::new(x, y, z)).abs() < 1e-5);
        }
    }

    #[test]
    fn stays_bounded_and_varies() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..2000 {
            let t = i as f32 * 0.137;
            let n = classic_noise(Vec3::new(t.sin() * 9.3, t * 0.71, t.cos() * 4.1));
            assert!(n.is_finite());
            assert!(n.abs() < 1.5, "noise out of range: {n}");
            min = min.min(n);
            max = max.max(n);
        }
        assert!(max - min > 0.5, "noise should not be flat");
    }
}
