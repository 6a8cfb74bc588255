//! Writer construction and resize failure modes

use fragment_codec::{
    AsciiFragment, AsciiFragmentWriter, DetectorFragmentWriter, OverlayError, ToyFragment,
    ToyFragmentWriter, UdpFragmentWriter,
};
use fragment_types::{
    AsciiMetadata, Fragment, FragmentBuffer, LayoutError, ToyMetadata, UdpMetadata, EVENT_SIZE_MAX,
};

fn assert_construction_error(result: Result<(), OverlayError>) {
    match result {
        Err(err) => assert!(err.is_construction_error(), "unexpected error: {}", err),
        Ok(()) => panic!("writer accepted a buffer it should refuse"),
    }
}

#[test]
fn test_writers_refuse_buffer_without_metadata() {
    let mut fragment = Fragment::new();
    assert_construction_error(AsciiFragmentWriter::new(&mut fragment).map(drop));
    assert_construction_error(UdpFragmentWriter::new(&mut fragment).map(drop));
    assert_construction_error(ToyFragmentWriter::new(&mut fragment).map(drop));
}

#[test]
fn test_writers_refuse_buffer_with_payload() {
    let mut fragment = Fragment::from_payload_bytes(&[1, 2, 3]);
    fragment.set_metadata(&UdpMetadata::new(1, 1));

    assert_construction_error(AsciiFragmentWriter::new(&mut fragment).map(drop));
    assert_construction_error(UdpFragmentWriter::new(&mut fragment).map(drop));
    assert_construction_error(ToyFragmentWriter::new(&mut fragment).map(drop));
    assert_construction_error(DetectorFragmentWriter::new(&mut fragment).map(drop));

    // The refused buffer is left as it was
    assert_eq!(fragment.payload_bytes()[..3], [1, 2, 3]);
}

#[test]
fn test_construction_leaves_empty_record() {
    let mut fragment = Fragment::with_metadata(&AsciiMetadata::new(0));
    let writer = AsciiFragmentWriter::new(&mut fragment).unwrap();
    assert_eq!(writer.event_size().unwrap(), 16);
    assert_eq!(writer.payload_element_count().unwrap(), 0);
    drop(writer);

    assert_eq!(fragment.payload_byte_size(), 16);
    assert!(AsciiFragment::new(&fragment).unwrap().line().unwrap().is_empty());
}

#[test]
fn test_oversized_resize_fails_without_touching_buffer() {
    let mut fragment = Fragment::with_metadata(&ToyMetadata::new(1, 12));
    let mut writer = ToyFragmentWriter::new(&mut fragment).unwrap();
    writer.write_adc_values(&[10, 20]).unwrap();

    // Two samples per word; this needs more words than the 28-bit size field holds
    let too_many = (EVENT_SIZE_MAX as usize) * 2;
    let err = writer.resize(too_many).unwrap_err();
    assert!(matches!(
        err,
        OverlayError::Layout(LayoutError::FieldOverflow { field: "event_size", bits: 28, .. })
    ));

    drop(writer);
    let reader = ToyFragment::new(&fragment).unwrap();
    assert_eq!(reader.event_size(), 3);
    assert_eq!(reader.adc_value(1).unwrap(), 20);
}

#[test]
fn test_resize_near_usize_max_is_an_error() {
    let mut fragment = Fragment::with_metadata(&AsciiMetadata::new(0));
    let mut writer = AsciiFragmentWriter::new(&mut fragment).unwrap();
    writer.write_line("kept").unwrap();

    // One character per word: adding the 16-word header cannot be represented
    for n in [usize::MAX, usize::MAX - 3, usize::MAX - 15] {
        assert!(matches!(
            writer.resize(n),
            Err(OverlayError::Layout(LayoutError::FieldOverflow { field: "event_size", .. }))
        ));
    }

    drop(writer);
    let reader = AsciiFragment::new(&fragment).unwrap();
    assert_eq!(reader.event_size(), 20);
    assert_eq!(reader.line().unwrap(), b"kept");
}

#[test]
fn test_shrinking_resize_recomputes_payload() {
    let mut fragment = Fragment::with_metadata(&ToyMetadata::new(1, 12));
    let mut writer = ToyFragmentWriter::new(&mut fragment).unwrap();
    writer.write_adc_values(&[1, 2, 3, 4, 5, 6]).unwrap();
    writer.resize(2).unwrap();

    assert_eq!(writer.payload_mut().unwrap().len(), 2);
    assert_eq!(writer.reader().unwrap().adc_value(2), Err(OverlayError::index_out_of_range(2, 2)));
}

#[test]
fn test_rewrite_clears_stale_padding() {
    let mut fragment = Fragment::with_metadata(&UdpMetadata::new(1, 1));
    let mut writer = UdpFragmentWriter::new(&mut fragment).unwrap();
    writer.write_datagram(b"ABCDEFGH").unwrap();
    writer.write_datagram(b"xy").unwrap();
    assert_eq!(writer.reader().unwrap().datagram().unwrap(), b"xy\0\0");

    let mut fragment = Fragment::with_metadata(&ToyMetadata::new(1, 12));
    let mut writer = ToyFragmentWriter::new(&mut fragment).unwrap();
    writer.write_adc_values(&[11, 22, 33, 44]).unwrap();
    writer.write_adc_values(&[55]).unwrap();
    let reader = writer.reader().unwrap();
    assert_eq!(reader.adc_value(0).unwrap(), 55);
    assert_eq!(reader.adc_value(1).unwrap(), 0);
}

#[test]
fn test_regrowth_exposes_zeroed_payload() {
    let mut fragment = Fragment::with_metadata(&ToyMetadata::new(1, 12));
    let mut writer = ToyFragmentWriter::new(&mut fragment).unwrap();
    writer.write_adc_values(&[1, 2, 3, 4, 5, 6]).unwrap();

    // The fourth sample shares the last kept word, so it stays
    writer.resize(3).unwrap();
    writer.resize(6).unwrap();
    let reader = writer.reader().unwrap();
    let values: Vec<u16> = (0..6).map(|i| reader.adc_value(i).unwrap()).collect();
    assert_eq!(values, [1, 2, 3, 4, 0, 0]);

    // 12 datagram bytes fill 16 buffer bytes; shrinking by one word leaves
    // the buffer's allocation unit untouched
    let mut fragment = Fragment::with_metadata(&UdpMetadata::new(1, 1));
    let mut writer = UdpFragmentWriter::new(&mut fragment).unwrap();
    writer.write_datagram(b"ABCDEFGHIJKL").unwrap();
    writer.resize(8).unwrap();
    writer.resize(12).unwrap();
    assert_eq!(
        writer.reader().unwrap().datagram().unwrap(),
        b"ABCDEFGH\0\0\0\0"
    );
}
