use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

// Acquisition constants for the synthetic 1H dataset.
const SW: f64 = 20.0276; // ppm
const O1: f64 = 2823.0; // Hz
const BF1: f64 = 600.13; // MHz
const SI: usize = 65536;
const NC_PROC: i32 = -3;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Chemical-shift axis, same arithmetic the viewer applies.
    let offset = SW / 2.0 - O1 / BF1;
    let start = SW - offset;
    let step = SW / SI as f64;
    let shifts: Vec<f64> = (0..SI).map(|i| start - step * i as f64).collect();

    // (ppm, width, height) per resonance – a rough small-molecule 1H spectrum.
    let resonances = [
        (8.21, 0.012, 410_000.0),
        (7.26, 0.010, 980_000.0),
        (3.66, 0.015, 760_000.0),
        (2.50, 0.010, 350_000.0),
        (1.21, 0.018, 620_000.0),
        (0.00, 0.008, 150_000.0),
    ];

    let signal: Vec<f64> = shifts
        .iter()
        .map(|&ppm| {
            let peaks: f64 = resonances
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(ppm, mu, sigma, amp))
                .sum();
            peaks + rng.gauss(0.0, 800.0)
        })
        .collect();

    let root = Path::new("sample_data");
    let pdata = root.join("pdata").join("1");
    fs::create_dir_all(&pdata).expect("Failed to create sample_data");

    // acqus lives at the dataset root, two levels above the pdata folder.
    fs::write(
        root.join("acqus"),
        format!(
            "##TITLE= Parameter file, TopSpin 4.1\n\
             ##JCAMPDX= 5.0\n\
             ##DATATYPE= Parameter Values\n\
             ##ORIGIN= generate_sample\n\
             ##$BF1= {BF1}\n\
             ##$O1= {O1}\n\
             ##$SW= {SW}\n\
             ##END=\n"
        ),
    )
    .expect("Failed to write acqus");

    fs::write(
        pdata.join("procs"),
        format!(
            "##TITLE= Parameter file, TopSpin 4.1\n\
             ##JCAMPDX= 5.0\n\
             ##$BYTORDP= 0\n\
             ##$DTYPP= 0\n\
             ##$NC_proc= {NC_PROC}\n\
             ##$SI= {SI}\n\
             ##END=\n"
        ),
    )
    .expect("Failed to write procs");

    // 1r: little-endian i32, stored value = real value / 2^NC_proc.
    let scale = 2.0_f64.powi(NC_PROC);
    let mut raw = Vec::with_capacity(SI * 4);
    for &v in &signal {
        raw.write_i32::<LittleEndian>((v / scale).round() as i32)
            .expect("Failed to encode 1r");
    }
    fs::write(pdata.join("1r"), raw).expect("Failed to write 1r");

    // peaklist.xml: one Peak1D per resonance.
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <PeakList modified=\"2024-05-14T10:31:00\">\n\
         \x20 <PeakList1D>\n\
         \x20   <PeakList1DHeader creator=\"generate_sample\"/>\n",
    );
    for &(ppm, _, height) in &resonances {
        xml.push_str(&format!(
            "    <Peak1D F1=\"{ppm:.4}\" intensity=\"{height:.1}\" type=\"0\"/>\n"
        ));
    }
    xml.push_str("  </PeakList1D>\n</PeakList>\n");
    fs::write(pdata.join("peaklist.xml"), xml).expect("Failed to write peaklist.xml");

    println!(
        "Wrote {} points and {} picked peaks to {}",
        SI,
        resonances.len(),
        pdata.display()
    );
}
