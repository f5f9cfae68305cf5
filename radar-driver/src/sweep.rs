use radar_data::Angle;

/// Remembers where the sensor last pointed. Unlike samples this never fades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepTracker {
    current_angle: Option<Angle>,
}

impl SweepTracker {
    pub fn new() -> SweepTracker {
        SweepTracker::default()
    }

    pub fn record(&mut self, angle: Angle) {
        self.current_angle = Some(angle);
    }

    pub fn current_angle(&self) -> Option<Angle> {
        self.current_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_overwrites() {
        let mut sweep = SweepTracker::new();
        assert_eq!(sweep.current_angle(), None);
        sweep.record(Angle::new(0).unwrap());
        assert_eq!(sweep.current_angle(), Angle::new(0));
        sweep.record(Angle::new(175).unwrap());
        sweep.record(Angle::new(170).unwrap());
        assert_eq!(sweep.current_angle(), Angle::new(170));
    }
}
