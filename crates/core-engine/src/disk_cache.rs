use core_geometry::{disk_offsets, ring_offsets, Coord};

/// Precomputed disk (print radius) and termination-ring (termination
/// radius) offset tables, built once per `FillingConfig` (§4.G "Setup").
#[derive(Debug, Clone)]
pub struct DiskCache {
    print_disk: Vec<Coord>,
    termination_ring: Vec<Coord>,
}

impl DiskCache {
    pub fn new(print_radius: f64, termination_radius: f64) -> Self {
        Self {
            print_disk: disk_offsets(print_radius),
            termination_ring: ring_offsets(termination_radius),
        }
    }

    pub fn print_disk(&self) -> &[Coord] {
        &self.print_disk
    }

    pub fn termination_ring(&self) -> &[Coord] {
        &self.termination_ring
    }
}
