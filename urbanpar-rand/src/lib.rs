// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Random fills for `urbanpar` datasets.
//!
//! There is no global or per-thread generator. A [`SeedStream`] is a small
//! `Copy` value handed to each task; the generator used for element `i` is
//! derived from the stream and `i` alone. A dataset filled from a stream is
//! therefore identical for every worker count.
//!
//! ```
//! use urbanpar::{Dataset, Pipeline};
//! use urbanpar_rand::{RandomExt, SeedStream};
//! use urbanpar_rand::rand_distr::Uniform;
//!
//! let stream = SeedStream::new(7).fork("noise");
//! let dist = Uniform::new(0, 100).unwrap();
//!
//! let mut a = Dataset::new("noise", 64);
//! let mut b = Dataset::new("noise", 64);
//! a.fill_random(&Pipeline::new(1).unwrap(), dist.clone(), stream).unwrap();
//! b.fill_random(&Pipeline::new(5).unwrap(), dist, stream).unwrap();
//! assert_eq!(a, b);
//! assert!(a.iter().all(|&x| (0..100).contains(&x)));
//! ```

use ::rand::rngs::SmallRng;
use ::rand::SeedableRng;
use ::rand_distr::Distribution;

use urbanpar::{Dataset, Pipeline, RecordSet, Result};

/// [`rand`](https://docs.rs/rand/), re-exported for convenience and to be able
/// to use the same version.
pub mod rand {
    pub use ::rand::*;
}

/// [`rand-distr`](https://docs.rs/rand_distr/), re-exported for convenience and
/// to be able to use the same version.
pub mod rand_distr {
    pub use ::rand_distr::*;
}

/// A deterministic source of independent per-index generators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SeedStream {
    key: u64,
}

impl SeedStream {
    pub fn new(seed: u64) -> Self
    {
        SeedStream { key: splitmix64(seed) }
    }

    /// Derive an independent stream for the task named `label`.
    pub fn fork(self, label: &str) -> Self
    {
        // FNV-1a over the label
        let hash = label
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3));
        SeedStream { key: splitmix64(self.key ^ hash) }
    }

    /// The generator for element `index`.
    pub fn rng_at(&self, index: usize) -> SmallRng
    {
        SmallRng::seed_from_u64(splitmix64(self.key.wrapping_add(index as u64)))
    }

    /// Draw the value of element `index` from `distribution`.
    pub fn sample_at<A, D>(&self, index: usize, distribution: &D) -> A
    where D: Distribution<A>
    {
        distribution.sample(&mut self.rng_at(index))
    }

    /// A fill function for [`Pipeline::run`] drawing every element from
    /// `distribution`.
    pub fn sampler<A, D>(self, distribution: D) -> impl Fn(usize) -> A + Sync
    where D: Distribution<A> + Sync
    {
        move |i| self.sample_at(i, &distribution)
    }
}

#[inline]
fn splitmix64(x: u64) -> u64
{
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Random fills for datasets.
///
/// This trait extends `urbanpar`'s datasets and can not be implemented
/// for other types.
pub trait RandomExt: private::Sealed {
    /// Element type drawn from the distribution.
    type Elem;

    /// Replace every element with a draw from `distribution`, in parallel on
    /// `pipeline`, using the generators of `stream`.
    fn fill_random<D>(&mut self, pipeline: &Pipeline, distribution: D, stream: SeedStream) -> Result<()>
    where D: Distribution<Self::Elem> + Sync;
}

impl<A> RandomExt for Dataset<A>
where A: Send
{
    type Elem = A;

    fn fill_random<D>(&mut self, pipeline: &Pipeline, distribution: D, stream: SeedStream) -> Result<()>
    where D: Distribution<A> + Sync
    {
        pipeline.run(self, stream.sampler(distribution), |_| ())
    }
}

impl<A> RandomExt for RecordSet<A>
where A: Clone + Send + Sync
{
    type Elem = A;

    /// Every field of record `i` is drawn from the generator of index `i`.
    fn fill_random<D>(&mut self, pipeline: &Pipeline, distribution: D, stream: SeedStream) -> Result<()>
    where D: Distribution<A> + Sync
    {
        pipeline.run_records(
            self,
            |i, record: &mut [A]| {
                let mut rng = stream.rng_at(i);
                for field in record {
                    *field = distribution.sample(&mut rng);
                }
                Ok::<_, std::convert::Infallible>(())
            },
            |_| Ok::<_, std::convert::Infallible>(()),
        )
    }
}

/// Create a dataset of `len` elements drawn from `distribution`.
pub fn random_dataset<A, D>(
    name: &str, len: usize, distribution: D, stream: SeedStream, pipeline: &Pipeline,
) -> Result<Dataset<A>>
where
    A: Clone + Default + Send,
    D: Distribution<A> + Sync,
{
    let mut d = Dataset::new(name, len);
    d.fill_random(pipeline, distribution, stream)?;
    Ok(d)
}

mod private {
    pub trait Sealed {}
    impl<A> Sealed for urbanpar::Dataset<A> {}
    impl<A> Sealed for urbanpar::RecordSet<A> {}
}
