//! Rayleigh + Mie single scattering, ray-marched on the CPU.
//!
//! The planet is centred at the origin. All positions are in metres and all
//! directions are unit vectors in one shared frame.

use std::f32::consts::PI;

use glam::Vec3;

/// Physical parameters of an atmosphere shell.
#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereParams {
    /// Ground radius in metres.
    pub planet_radius: f32,
    /// Top of the atmosphere in metres.
    pub atmosphere_radius: f32,
    /// Rayleigh scattering coefficients at ground level, per RGB channel.
    pub rayleigh_coefficients: [f32; 3],
    /// Altitude over which Rayleigh density falls by `1/e`.
    pub rayleigh_scale_height: f32,
    /// Mie scattering coefficient at ground level.
    pub mie_coefficient: f32,
    /// Altitude over which Mie density falls by `1/e`.
    pub mie_scale_height: f32,
    /// Henyey-Greenstein asymmetry of the Mie lobe.
    pub mie_direction: f32,
    /// Sun radiance multiplier.
    pub sun_intensity: f32,
}

impl AtmosphereParams {
    /// Earth's atmosphere scaled to a planet of `planet_radius` metres.
    pub fn earth_like(planet_radius: f32) -> Self {
        Self {
            planet_radius,
            atmosphere_radius: planet_radius * 1.025,
            rayleigh_coefficients: [5.5e-6, 13.0e-6, 22.4e-6],
            rayleigh_scale_height: 8_500.0,
            mie_coefficient: 21e-6,
            mie_scale_height: 1_200.0,
            mie_direction: 0.758,
            sun_intensity: 22.0,
        }
    }

    /// Relative Rayleigh and Mie densities at `altitude` above the ground.
    fn densities(&self, altitude: f32) -> (f32, f32) {
        (
            (-altitude / self.rayleigh_scale_height).exp(),
            (-altitude / self.mie_scale_height).exp(),
        )
    }

    fn altitude(&self, position: Vec3) -> f32 {
        position.length() - self.planet_radius
    }
}

impl Default for AtmosphereParams {
    fn default() -> Self {
        Self::earth_like(6_371_000.0)
    }
}

/// Ray-march resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScatterSamples {
    /// Steps along the view ray.
    pub view: u32,
    /// Steps along each ray towards the sun.
    pub light: u32,
}

impl Default for ScatterSamples {
    fn default() -> Self {
        Self { view: 16, light: 8 }
    }
}

/// Distances `(near, far)` along `dir` at which the ray from `origin`
/// crosses the sphere, or `None` when it misses.
pub fn ray_sphere_intersect(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<(f32, f32)> {
    let to_origin = origin - center;
    let half_b = to_origin.dot(dir);
    let c = to_origin.length_squared() - radius * radius;
    let discriminant = half_b * half_b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    Some((-half_b - root, -half_b + root))
}

/// The part of the view ray inside the atmosphere and above the ground.
fn view_segment(camera: Vec3, look: Vec3, params: &AtmosphereParams) -> Option<(f32, f32)> {
    let (near, far) = ray_sphere_intersect(camera, look, Vec3::ZERO, params.atmosphere_radius)?;
    if far < 0.0 {
        return None;
    }
    let start = near.max(0.0);
    let end = match ray_sphere_intersect(camera, look, Vec3::ZERO, params.planet_radius) {
        Some((ground, _)) if ground > 0.0 => far.min(ground),
        _ => far,
    };
    (end > start).then_some((start, end))
}

/// Rayleigh and Mie optical depth from `origin` to the top of the
/// atmosphere along `sun`.
fn sun_optical_depth(origin: Vec3, sun: Vec3, params: &AtmosphereParams, steps: u32) -> (f32, f32) {
    let Some((_, exit)) = ray_sphere_intersect(origin, sun, Vec3::ZERO, params.atmosphere_radius) else {
        return (0.0, 0.0);
    };
    let step = exit.max(0.0) / steps as f32;
    (0..steps).fold((0.0, 0.0), |(rayleigh, mie), j| {
        let point = origin + sun * ((j as f32 + 0.5) * step);
        let (dr, dm) = params.densities(params.altitude(point));
        (rayleigh + dr * step, mie + dm * step)
    })
}

/// Linear single-scattered radiance (RGB, unbounded) reaching `camera`
/// from direction `look` with the sun towards `sun`.
pub fn compute_single_scatter(
    camera: Vec3,
    look: Vec3,
    sun: Vec3,
    params: &AtmosphereParams,
    samples: ScatterSamples,
) -> [f32; 3] {
    let Some((start, end)) = view_segment(camera, look, params) else {
        return [0.0; 3];
    };

    let step = (end - start) / samples.view as f32;
    let beta_r = Vec3::from(params.rayleigh_coefficients);
    let beta_m = Vec3::splat(params.mie_coefficient);

    let mut view_depth = (0.0_f32, 0.0_f32);
    let mut in_rayleigh = Vec3::ZERO;
    let mut in_mie = Vec3::ZERO;

    for i in 0..samples.view {
        let point = camera + look * (start + (i as f32 + 0.5) * step);
        let (dr, dm) = params.densities(params.altitude(point));
        view_depth.0 += dr * step;
        view_depth.1 += dm * step;

        let sun_depth = sun_optical_depth(point, sun, params, samples.light);
        let tau = beta_r * (view_depth.0 + sun_depth.0) + beta_m * (view_depth.1 + sun_depth.1);
        let transmittance = Vec3::new((-tau.x).exp(), (-tau.y).exp(), (-tau.z).exp());

        in_rayleigh += transmittance * (dr * step);
        in_mie += transmittance * (dm * step);
    }

    let cos_theta = look.dot(sun);
    let radiance = beta_r * in_rayleigh * rayleigh_phase(cos_theta)
        + beta_m * in_mie * mie_phase(cos_theta, params.mie_direction);
    (radiance * params.sun_intensity).to_array()
}

/// Degree of linear polarisation of single-scattered skylight.
///
/// Rayleigh model: `dop_max · sin²γ / (1 + cos²γ)` with γ the angle between
/// the view direction and the sun.
pub fn rayleigh_degree_of_polarisation(look: Vec3, sun: Vec3, dop_max: f32) -> f32 {
    let cos_gamma = look.dot(sun).clamp(-1.0, 1.0);
    let cos2 = cos_gamma * cos_gamma;
    (dop_max * (1.0 - cos2) / (1.0 + cos2)).clamp(0.0, 1.0)
}

fn rayleigh_phase(cos_theta: f32) -> f32 {
    3.0 / (16.0 * PI) * (1.0 + cos_theta * cos_theta)
}

/// Cornette-Shanks form of the Henyey-Greenstein phase function.
fn mie_phase(cos_theta: f32, g: f32) -> f32 {
    let g2 = g * g;
    let numerator = 3.0 * (1.0 - g2) * (1.0 + cos_theta * cos_theta);
    let denominator = 8.0 * PI * (2.0 + g2) * (1.0 + g2 - 2.0 * g * cos_theta).powf(1.5);
    numerator / denominator
}
