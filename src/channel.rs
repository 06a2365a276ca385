use thiserror::Error;

/// A scan reported a center frequency outside the supported 2.4/5 GHz
/// bands. This signals a radio band the log schema cannot describe, so it
/// must never silently map to a channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frequency {0} MHz is outside the supported 2.4/5 GHz bands")]
pub struct OutOfRangeFrequency(pub u32);

/// Maps a center frequency in MHz to its channel number.
pub fn to_channel(freq_mhz: u32) -> Result<u32, OutOfRangeFrequency> {
    if (2412..=2484).contains(&freq_mhz) {
        Ok((freq_mhz - 2412) / 5 + 1)
    } else if (5170..=5825).contains(&freq_mhz) {
        Ok((freq_mhz - 5170) / 5 + 34)
    } else {
        Err(OutOfRangeFrequency(freq_mhz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_2g4_band() {
        assert_eq!(to_channel(2412), Ok(1));
        assert_eq!(to_channel(2437), Ok(6));
        assert_eq!(to_channel(2462), Ok(11));
    }

    #[test]
    fn maps_5g_band() {
        assert_eq!(to_channel(5170), Ok(34));
        assert_eq!(to_channel(5180), Ok(36));
        assert_eq!(to_channel(5825), Ok(165));
    }

    #[test]
    fn rejects_out_of_band_frequencies() {
        for freq in [0, 2411, 2485, 5169, 5826, 60_000] {
            assert_eq!(to_channel(freq), Err(OutOfRangeFrequency(freq)));
        }
    }

    #[test]
    fn every_valid_frequency_yields_a_positive_channel() {
        for freq in (2412..=2484).chain(5170..=5825) {
            let channel = to_channel(freq).unwrap();
            assert!(channel >= 1, "frequency {freq} mapped to channel {channel}");
        }
    }
}
