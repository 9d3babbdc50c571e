//! パイプライン統合テスト

use super::*;
use crate::grid::{BoundedGrid, DynamicGrid};
use crate::layers::sigmoid;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn random_values(rng: &mut Xoshiro256PlusPlus, count: usize) -> Vec<f64> {
    (0..count).map(|_| rng.random_range(-2.0..2.0)).collect()
}

fn kernel<G: Grid>(size: usize, values: &[f64]) -> Kernel<G> {
    Kernel::new(G::from_values(size, values).unwrap()).unwrap()
}

/// 入力 5、カーネル 3（全要素 1/9）、パディング 1 → 7 → 畳み込み 5 → プーリング 2
#[test]
fn test_end_to_end_box_filter() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let input = DynamicGrid::from_values(5, &random_values(&mut rng, 25)).unwrap();
    let box_kernel: Kernel<DynamicGrid> = kernel(3, &[1.0 / 9.0; 9]);

    let pipeline = Pipeline::new(&PipelineConfig::default()).unwrap();
    let sizes = pipeline.stage_sizes(5, 3).unwrap();
    assert_eq!(
        sizes,
        StageSizes {
            input: 5,
            padded: 7,
            conv: 5,
            pooled: 2
        }
    );

    let out = pipeline.forward(&input, std::slice::from_ref(&box_kernel)).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].dimension(), 2);
    for &v in out[0].to_rows().iter().flatten() {
        assert!(v > 0.0 && v < 1.0, "pooled value {v} outside (0, 1)");
    }
}

/// 段ごとに手で組んだ結果とパイプラインの結果が一致すること
#[test]
fn test_forward_matches_manual_stages() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let input = DynamicGrid::from_values(6, &random_values(&mut rng, 36)).unwrap();
    let k: Kernel<DynamicGrid> = kernel(3, &random_values(&mut rng, 9));

    let padded = ZeroPad::new(1).apply(&input).unwrap();
    let mut conv = CrossCorrelation::default().apply(&padded, k.grid()).unwrap();
    Sigmoid::apply(&mut conv);
    let expected = MaxPool::new(2, 2).unwrap().apply(&conv).unwrap();

    let out = Pipeline::new(&PipelineConfig::default())
        .unwrap()
        .forward(&input, &[k])
        .unwrap();
    assert_eq!(out[0], expected);
}

/// 3 カーネルの結果がカーネル順に並ぶこと
#[test]
fn test_branch_order_preserved() {
    let input = DynamicGrid::from_values(4, &[1.0; 16]).unwrap();
    // 中央の重み w のみ → 内部セルは sigmoid(w)
    let weights = [-3.0, 0.0, 3.0];
    let kernels: Vec<Kernel<DynamicGrid>> = weights
        .iter()
        .map(|&w| {
            let mut values = [0.0; 9];
            values[4] = w;
            kernel(3, &values)
        })
        .collect();

    for execution in [Execution::Sequential, Execution::Parallel] {
        let config = PipelineConfig {
            execution,
            ..PipelineConfig::default()
        };
        let out = Pipeline::new(&config).unwrap().forward(&input, &kernels).unwrap();
        assert_eq!(out.len(), 3);
        for (pooled, &w) in out.iter().zip(&weights) {
            assert_eq!(pooled.dimension(), 2);
            for &v in pooled.to_rows().iter().flatten() {
                assert_eq!(v, sigmoid(w), "execution={execution:?}, w={w}");
            }
        }
    }
}

/// 全ゼロカーネルでは全出力が 0.5
#[test]
fn test_zero_kernels_pool_to_half() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
    let input = BoundedGrid::<16>::from_values(8, &random_values(&mut rng, 64)).unwrap();
    let kernels: Vec<Kernel<BoundedGrid<16>>> = (0..3).map(|_| kernel(3, &[0.0; 9])).collect();
    let out = Pipeline::new(&PipelineConfig::default())
        .unwrap()
        .forward(&input, &kernels)
        .unwrap();
    for pooled in &out {
        assert_eq!(pooled.dimension(), 4);
        assert!(pooled.to_rows().iter().flatten().all(|&v| v == 0.5));
    }
}

/// 表現・実行方式の全組み合わせで結果が一致すること
#[test]
fn test_layouts_and_executions_agree() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1234);
    let n = 13;
    let input_values = random_values(&mut rng, n * n);
    let kernel_values: Vec<Vec<f64>> = (0..3).map(|_| random_values(&mut rng, 25)).collect();

    let config = |execution| PipelineConfig {
        pool_size: 3,
        stride: 2,
        execution,
    };

    let dyn_input = DynamicGrid::from_values(n, &input_values).unwrap();
    let dyn_kernels: Vec<Kernel<DynamicGrid>> = kernel_values.iter().map(|v| kernel(5, v)).collect();
    let reference = Pipeline::new(&config(Execution::Sequential))
        .unwrap()
        .forward(&dyn_input, &dyn_kernels)
        .unwrap();

    let bnd_input = BoundedGrid::<32>::from_values(n, &input_values).unwrap();
    let bnd_kernels: Vec<Kernel<BoundedGrid<32>>> =
        kernel_values.iter().map(|v| kernel(5, v)).collect();

    for execution in [Execution::Sequential, Execution::Parallel] {
        let dyn_out = Pipeline::new(&config(execution))
            .unwrap()
            .forward(&dyn_input, &dyn_kernels)
            .unwrap();
        let bnd_out = Pipeline::new(&config(execution))
            .unwrap()
            .forward(&bnd_input, &bnd_kernels)
            .unwrap();
        for i in 0..3 {
            // (13 - 3) / 2 + 1 = 6
            assert_eq!(reference[i].dimension(), 6);
            assert_eq!(dyn_out[i].max_abs_diff(&reference[i]), Some(0.0));
            assert_eq!(bnd_out[i].max_abs_diff(&reference[i]), Some(0.0));
        }
    }
}

#[test]
fn test_kernel_size_mismatch() {
    let input = DynamicGrid::create(5).unwrap();
    let kernels: Vec<Kernel<DynamicGrid>> =
        vec![kernel(3, &[0.0; 9]), kernel(3, &[0.0; 9]), kernel(5, &[0.0; 25])];
    let err = Pipeline::new(&PipelineConfig::default())
        .unwrap()
        .forward(&input, &kernels)
        .unwrap_err();
    assert!(matches!(
        err,
        ConvError::KernelSizeMismatch {
            index: 2,
            expected: 3,
            actual: 5
        }
    ));
}

#[test]
fn test_no_kernels() {
    let input = DynamicGrid::create(5).unwrap();
    let kernels: Vec<Kernel<DynamicGrid>> = Vec::new();
    let err = Pipeline::new(&PipelineConfig::default())
        .unwrap()
        .forward(&input, &kernels)
        .unwrap_err();
    assert!(matches!(err, ConvError::NoKernels));
}

/// プーリング窓が畳み込み出力より大きい場合は計算前に失敗する
#[test]
fn test_pool_larger_than_conv_output() {
    let input = DynamicGrid::from_values(1, &[0.7]).unwrap();
    let kernels: Vec<Kernel<DynamicGrid>> = vec![kernel(3, &[1.0; 9])];
    let err = Pipeline::new(&PipelineConfig::default())
        .unwrap()
        .forward(&input, &kernels)
        .unwrap_err();
    assert!(matches!(err, ConvError::InvalidDimensions { stage: "pooling", .. }));
}

/// 固定容量を超えるパディングは CapacityExceeded
#[test]
fn test_bounded_capacity_exceeded_by_padding() {
    let input = BoundedGrid::<8>::create(8).unwrap();
    let kernels: Vec<Kernel<BoundedGrid<8>>> = vec![kernel(3, &[0.0; 9])];
    let err = Pipeline::new(&PipelineConfig::default())
        .unwrap()
        .forward(&input, &kernels)
        .unwrap_err();
    assert!(matches!(
        err,
        ConvError::CapacityExceeded {
            requested: 10,
            capacity: 8
        }
    ));
}

#[test]
fn test_even_kernel_grows_output() {
    // k=2, pad=1: 4 → 6 → 5 → (5-2)/2+1 = 2
    let pipeline = Pipeline::new(&PipelineConfig::default()).unwrap();
    let sizes = pipeline.stage_sizes(4, 2).unwrap();
    assert_eq!(sizes.padded, 6);
    assert_eq!(sizes.conv, 5);
    assert_eq!(sizes.pooled, 2);
}

#[test]
fn test_invalid_pool_config() {
    let config = PipelineConfig {
        pool_size: 0,
        ..PipelineConfig::default()
    };
    assert!(Pipeline::new(&config).is_err());
}
