use rand::Rng;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::AudioFrame;
use crate::constants::spectrum::{
    BAR_CAP, BAR_COUNT, BAR_SCALE, END_BIN, FFT_SIZE, FIRST_BIN, INPUT_GAIN,
};

/// Number of magnitudes kept per analysis (bins `FIRST_BIN..END_BIN`)
pub const ANALYZED_BINS: usize = END_BIN - FIRST_BIN;

/// One height per bar, index-stable around the shape
pub type SpectralBars = [f32; BAR_COUNT];

/// Turns the latest audio frame into raw target bar heights
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    window: Vec<f32>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let window = (0..FFT_SIZE).map(|i| hamming_window(i, FFT_SIZE)).collect();

        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            window,
            magnitudes: Vec::with_capacity(ANALYZED_BINS),
        }
    }

    /// Magnitudes of bins `FIRST_BIN..END_BIN` in frequency order.
    pub fn magnitudes(&mut self, frame: &AudioFrame) -> &[f32] {
        let samples = frame.samples();
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * INPUT_GAIN * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        // Normalized forward transform: the bar scale was tuned against 1/N output
        let norm = 1.0 / FFT_SIZE as f32;
        self.magnitudes.clear();
        self.magnitudes.extend(
            self.buffer[FIRST_BIN..END_BIN]
                .iter()
                .map(|bin| bin.norm() * norm),
        );
        &self.magnitudes
    }

    /// Full analysis: transform, scatter the magnitudes, map them onto bars.
    pub fn analyze<R: Rng + ?Sized>(&mut self, frame: &AudioFrame, rng: &mut R) -> SpectralBars {
        self.magnitudes(frame);
        shuffle(&mut self.magnitudes, rng);
        map_to_bars(&self.magnitudes)
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Hamming window weight for `index` in a window of `size` samples
pub fn hamming_window(index: usize, size: usize) -> f32 {
    0.54 - 0.46 * (2.0 * std::f32::consts::PI * index as f32 / (size as f32 - 1.0)).cos()
}

/// In-place Fisher-Yates permutation.
///
/// Scatters energy around the ring so the bars never show a low-to-high
/// frequency gradient.
pub fn shuffle<R: Rng + ?Sized>(values: &mut [f32], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.random_range(0..=i);
        values.swap(i, j);
    }
}

/// Cyclic mapping of magnitudes onto bars: bar `i` reads `magnitudes[i % len]`.
pub fn map_to_bars(magnitudes: &[f32]) -> SpectralBars {
    let mut bars = [0.0; BAR_COUNT];
    if magnitudes.is_empty() {
        return bars;
    }
    for (i, bar) in bars.iter_mut().enumerate() {
        *bar = (magnitudes[i % magnitudes.len()] * BAR_SCALE).min(BAR_CAP);
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sine_at_bin(bin: usize, amplitude: f32) -> AudioFrame {
        let samples = (0..FFT_SIZE)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * bin as f32 * i as f32 / FFT_SIZE as f32;
                phase.sin() * amplitude
            })
            .collect();
        AudioFrame::new(samples)
    }

    #[test]
    fn test_hamming_window_shape() {
        assert!((hamming_window(0, FFT_SIZE) - 0.08).abs() < 1e-4);
        assert!((hamming_window(FFT_SIZE - 1, FFT_SIZE) - 0.08).abs() < 1e-4);
        let middle = hamming_window(FFT_SIZE / 2, FFT_SIZE);
        assert!((middle - 1.0).abs() < 1e-3, "middle weight was {}", middle);
    }

    #[test]
    fn test_zero_input_gives_zero_spectrum() {
        let mut analyzer = SpectrumAnalyzer::new();
        let frame = AudioFrame::new(vec![0.0; FFT_SIZE]);
        let magnitudes = analyzer.magnitudes(&frame);

        assert_eq!(magnitudes.len(), ANALYZED_BINS);
        assert!(magnitudes.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_empty_frame_is_zero_padded() {
        let mut analyzer = SpectrumAnalyzer::new();
        let mut rng = StdRng::seed_from_u64(1);
        let bars = analyzer.analyze(&AudioFrame::default(), &mut rng);
        assert!(bars.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_sine_peak_lands_in_its_bin() {
        let mut analyzer = SpectrumAnalyzer::new();
        let magnitudes = analyzer.magnitudes(&sine_at_bin(50, 0.5)).to_vec();

        let (peak_index, peak) = magnitudes
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        assert_eq!(peak_index + FIRST_BIN, 50);
        // 0.5 amplitude * gain 100 * window mean 0.54 / 2
        assert!((peak - 13.5).abs() < 0.2, "peak magnitude was {}", peak);
    }

    #[test]
    fn test_short_frame_only_uses_available_samples() {
        let mut analyzer = SpectrumAnalyzer::new();
        let full = sine_at_bin(50, 0.5);
        let half = AudioFrame::new(full.samples()[..FFT_SIZE / 2].to_vec());

        let full_peak = analyzer.magnitudes(&full)[48];
        let half_peak = analyzer.magnitudes(&half)[48];
        assert!(half_peak < full_peak);
        assert!(half_peak > 0.0);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let original: Vec<f32> = (0..ANALYZED_BINS).map(|i| i as f32 * 0.25).collect();
        let mut shuffled = original.clone();
        shuffle(&mut shuffled, &mut rng);

        let mut sorted = shuffled.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(sorted, original);
        assert_ne!(shuffled, original);
    }

    #[test]
    fn test_bar_mapping_reuses_magnitudes_cyclically() {
        let magnitudes: Vec<f32> = (0..ANALYZED_BINS).map(|i| i as f32 * 1e-4).collect();
        let bars = map_to_bars(&magnitudes);
        for (i, &bar) in bars.iter().enumerate() {
            let expected = (magnitudes[i % ANALYZED_BINS] * BAR_SCALE).min(BAR_CAP);
            assert_eq!(bar, expected);
        }

        // With fewer magnitudes than bars the index wraps
        let short = [0.001, 0.002, 0.003];
        let bars = map_to_bars(&short);
        assert_eq!(bars[3], bars[0]);
        assert_eq!(bars[59], bars[2]);
    }

    #[test]
    fn test_bar_heights_are_capped() {
        let bars = map_to_bars(&[10.0, 0.1, 0.0001]);
        assert_eq!(bars[0], BAR_CAP);
        assert!((bars[1] - 100.0).abs() < 1e-3);
        assert!((bars[2] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_analyze_maps_shuffled_magnitudes() {
        let mut analyzer = SpectrumAnalyzer::new();
        let frame = sine_at_bin(50, 0.5);
        let mut sorted_before = analyzer.magnitudes(&frame).to_vec();
        sorted_before.sort_by(|a, b| a.total_cmp(b));

        let mut rng = StdRng::seed_from_u64(3);
        let bars = analyzer.analyze(&frame, &mut rng);
        let shuffled = analyzer.magnitudes.clone();

        let mut sorted_after = shuffled.clone();
        sorted_after.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(sorted_before, sorted_after);
        assert_eq!(bars, map_to_bars(&shuffled));
    }
}
