use chrono::NaiveDate;
use serde_json::json;

use carsearch_core::generator::CarGenerator;
use carsearch_core::validation::{validate, validate_text_field};
use carsearch_core::{Car, FilterField, FilterInput};

#[test]
fn generated_cars_pass_their_own_validator() {
    let mut generator = CarGenerator::seeded(2024);
    for car in generator.generate_batch(5_000) {
        assert!(!car.brand.is_empty() && !car.color.is_empty());
        validate_text_field(FilterField::Brand, &car.brand).expect("brand accepted");
        validate_text_field(FilterField::Color, &car.color).expect("color accepted");
        let input = FilterInput { brand: Some(car.brand.clone()), color: Some(car.color.clone()), ..Default::default() };
        validate(&input).expect("generated filter accepted");
    }
}

#[test]
fn car_json_uses_camel_case_and_iso_dates() {
    let car = Car::new("Toyota", "white", 12_000, NaiveDate::from_ymd_opt(2019, 3, 4).unwrap()).with_id("abc");
    let value = serde_json::to_value(&car).unwrap();
    assert_eq!(
        value,
        json!({ "id": "abc", "brand": "Toyota", "color": "white", "price": 12000, "firstReleaseDate": "2019-03-04" })
    );
}

#[test]
fn car_json_without_id_deserializes_unsaved() {
    let car: Car = serde_json::from_value(json!({
        "brand": "Honda", "color": "red", "price": 9000, "firstReleaseDate": "2015-01-20"
    }))
    .unwrap();
    assert!(car.id.is_none());
    assert_eq!(car.first_release_date, NaiveDate::from_ymd_opt(2015, 1, 20).unwrap());
}

#[test]
fn display_is_the_echo_representation() {
    let car = Car::new("BMW", "black", 50_000, NaiveDate::from_ymd_opt(2020, 12, 1).unwrap());
    assert_eq!(car.to_string(), "Car{id=null, brand=BMW, color=black, price=50000, firstReleaseDate=2020-12-01}");
    assert!(car.with_id("x1").to_string().starts_with("Car{id=x1, "));
}
