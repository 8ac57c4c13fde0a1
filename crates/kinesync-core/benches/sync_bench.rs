//! 编辑路径性能基准测试
//!
//! 指针拖拽每帧都会走一遍 量化 → 逆解 → 有效解 → 推送，这里测量引擎自身的开销。

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kinesync_core::prelude::*;
use kinesync_core::{QuantizeMode, quantize, resolve};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{TableKinematics, all_configs, branch_angles};

fn bench_quantize(c: &mut Criterion) {
    c.bench_function("quantize_continuous", |b| {
        b.iter(|| {
            black_box(quantize(
                black_box(12.34),
                black_box(12.3),
                black_box(12.31),
                QuantizeMode::Continuous,
            ))
        });
    });
}

fn bench_resolve_fallback(c: &mut Criterion) {
    // 只剩最后一个候选可用：最坏情况
    let only = KinematicConfiguration::new(Direction::Front, Flip::NoFlip, Turn::Down);
    let solutions: ValidSolutionSet = std::iter::once(KinematicsSolution::new(
        only,
        branch_angles(&Pose::ZERO, only),
    ))
    .collect();
    let requested = KinematicConfiguration::new(Direction::Front, Flip::NoFlip, Turn::Up);

    c.bench_function("resolve_fallback", |b| {
        b.iter(|| black_box(resolve(requested, ConfigAxis::Direction, black_box(&solutions))));
    });
}

fn bench_angle_edit(c: &mut Criterion) {
    let mut sync = StateSynchronizer::new(TableKinematics::everywhere(), SyncSettings::default());
    let mut value = 0.0;

    c.bench_function("angle_edit", |b| {
        b.iter(|| {
            value = if value > 90.0 { 0.0 } else { value + 0.7 };
            black_box(sync.on_angle_edited(Actuator::Shoulder, value))
        });
    });
}

fn bench_drag_motion(c: &mut Criterion) {
    let kin = TableKinematics::new(all_configs(), all_configs());
    let mut session = Session::new(kin, &EngineConfig::default());
    session.pointer_press(DragPlane::PositionYZ, 0.0, 0.0);
    let mut x = 0.0;

    c.bench_function("drag_motion", |b| {
        b.iter(|| {
            x = if x > 300.0 { 0.0 } else { x + 1.0 };
            let outcome = session.pointer_motion(x, 0.0);
            session.render_complete(session.snapshot().revision);
            black_box(outcome)
        });
    });
}

criterion_group!(
    benches,
    bench_quantize,
    bench_resolve_fallback,
    bench_angle_edit,
    bench_drag_motion
);
criterion_main!(benches);
