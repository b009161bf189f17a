use criterion::{Criterion, black_box, criterion_group, criterion_main};
use neural_network::{ActivationType, Network};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn train_xor_network(c: &mut Criterion) {
    // XOR training data
    let inputs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let targets = [[0.0], [1.0], [1.0], [0.0]];

    // Test different network configurations
    let configs: [&[usize]; 3] = [&[2, 4, 1], &[2, 4, 3, 1], &[2, 16, 16, 16, 1]];

    for layers in configs {
        for activation in ActivationType::ALL {
            let name = format!("train_xor_{layers:?}_{activation}");
            let mut network = Network::with_rng(layers, &mut StdRng::seed_from_u64(42)).unwrap();
            c.bench_function(&name, |b| {
                b.iter(|| {
                    for (input, target) in inputs.iter().zip(targets.iter()) {
                        network.forward(Some(black_box(input.as_slice())), activation);
                        network.backward(black_box(target.as_slice()), activation, 0.1);
                    }
                })
            });
        }
    }
}

fn grow_network(c: &mut Criterion) {
    c.bench_function("add_neuron_to_hidden_layer", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut network = Network::with_rng(&[2, 4, 4, 1], &mut rng).unwrap();
            for _ in 0..32 {
                network.add_neuron_with_rng(black_box(1), &mut rng);
            }
            network
        })
    });
}

criterion_group!(benches, train_xor_network, grow_network);
criterion_main!(benches);
