#![feature(test)]
extern crate test;

use smolprng::{JsfLarge, PRNG};
use spvar::fixing::FixedVariables;
use spvar::ising::IsingModel;
use spvar::local_search::LocalSearchSampler;
use spvar::reduction::reduce_model;
use spvar::spvar::spvar_from_samples;
use spvar::spvar_options::SpvarOptions;
use spvar::sample::SampleOracle;

const SIZE: usize = 1024;

#[bench]
fn bench_reduce_model(b: &mut test::Bencher) {
    let mut prng = PRNG {
        generator: JsfLarge::default(),
    };

    let model = IsingModel::make_random(SIZE, &mut prng, 0.05);

    // fix every other variable
    let fixed = FixedVariables::from_pairs((0..SIZE).step_by(2).map(|i| (i, if i % 4 == 0 { 1 } else { -1 })))
        .unwrap();

    b.iter(|| reduce_model(&model, &fixed).unwrap());
}

#[bench]
fn bench_spvar_from_samples(b: &mut test::Bencher) {
    let mut prng = PRNG {
        generator: JsfLarge::default(),
    };

    let model = IsingModel::make_random(SIZE, &mut prng, 0.01);
    let mut sampler = LocalSearchSampler::new(prng);
    let samples = sampler.sample(&model, 100, 10);

    let options = SpvarOptions::new();

    b.iter(|| spvar_from_samples(&model, &samples, &options).unwrap());
}
