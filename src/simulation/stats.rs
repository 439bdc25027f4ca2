//! Run statistics

use log::info;

/// Snapshot of a simulation's progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Cycles executed so far
    pub cycles: u64,
    /// Vehicles that have entered the map
    pub vehicles: usize,
    /// Vehicles that reached their destination
    pub arrived: usize,
    /// Vehicles parked before reaching their destination
    pub parked: usize,
    /// Vehicles still moving
    pub en_route: usize,
    /// Vehicles scheduled but not yet released
    pub pending: usize,
    /// Segments currently closed
    pub closed_segments: usize,
}

impl SimulationStats {
    /// Share of entered vehicles that truly arrived, in percent
    pub fn success_rate(&self) -> f64 {
        if self.vehicles == 0 {
            return 0.0;
        }
        self.arrived as f64 / self.vehicles as f64 * 100.0
    }

    /// Writes the statistics to the log at info level
    pub fn log_summary(&self) {
        info!("Cycles: {}", self.cycles);
        info!("Total vehicles: {}", self.vehicles);
        info!("Arrived: {}", self.arrived);
        info!("Parked early: {}", self.parked);
        info!("En route: {}", self.en_route);
        info!("Pending: {}", self.pending);
        info!("Closed segments: {}", self.closed_segments);
        info!("Success rate: {:.1}%", self.success_rate());
    }
}
