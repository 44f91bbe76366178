use silk_params::SilkError;
use silk_params::silk::schur::schur;

#[test]
fn schur_matches_reference_alternating_case() {
    let mut rc = [0i16; 6];
    let c = [
        1_056_964_608,
        -268_435_456,
        134_217_728,
        -67_108_864,
        33_554_432,
        -16_777_216,
        8_388_608,
    ];
    let res = schur(&mut rc, &c).expect("order 6 is supported");
    assert_eq!(984_051_516, res);
    assert_eq!([8322, -2188, 578, -152, 40, -10], rc);
}

#[test]
fn first_order_process_needs_one_coefficient() {
    let c: [i32; 11] = core::array::from_fn(|k| 1 << (28 - k));
    for order in [6usize, 10] {
        let mut rc = [1i16; 10];
        let res = schur(&mut rc[..order], &c).expect("supported order");
        // 0.75 of the energy is left after removing the first lag
        assert_eq!(201_326_592, res);
        assert_eq!(-16_384, rc[0]);
        assert!(rc[1..order].iter().all(|&k| k == 0), "order {order}: {rc:?}");
    }
}

#[test]
fn schur_rejects_odd_orders() {
    let mut rc = [0i16; 7];
    let c = [1 << 20; 8];
    assert_eq!(schur(&mut rc, &c), Err(SilkError::UnsupportedOrder(7)));
}
