use rocketfile::rocksim::{self, translate_ring, RingRecord};
use rocketfile::warnings::{Warning, WarningSet};
use rocketfile::ImportError;
use rocketfile_core::models::*;
use speculate2::speculate;

const DESIGN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RockSimDocument>
  <FileVersion>4</FileVersion>
  <DesignInformation>
    <RocketDesign>
      <Name>Sample</Name>
      <StageCount>1</StageCount>
      <Stage3Parts>
        <NoseCone>
          <Name>Nose</Name>
          <Len>100</Len>
          <BaseDia>40</BaseDia>
          <ShapeCode>1</ShapeCode>
          <WallThickness>2</WallThickness>
          <FinishCode>1</FinishCode>
        </NoseCone>
        <BodyTube>
          <Name>Main</Name>
          <Len>300</Len>
          <OD>40</OD>
          <ID>38</ID>
          <FinishCode>3</FinishCode>
          <AttachedParts>
            <FinSet>
              <Name>Fins</Name>
              <FinCount>3</FinCount>
              <RootChord>60</RootChord>
              <TipChord>30</TipChord>
              <SemiSpan>40</SemiSpan>
              <SweepDistance>20</SweepDistance>
              <Thickness>3</Thickness>
              <TipShapeCode>1</TipShapeCode>
              <LocationMode>1</LocationMode>
              <Xb>-10</Xb>
            </FinSet>
            <Ring>
              <Name>Block</Name>
              <OD>38</OD>
              <ID>20</ID>
              <Len>10</Len>
              <UsageCode>2</UsageCode>
              <LocationMode>0</LocationMode>
              <Xb>250</Xb>
            </Ring>
            <Ring>
              <Name>Odd</Name>
              <UsageCode>7</UsageCode>
            </Ring>
          </AttachedParts>
        </BodyTube>
        <Transition>
          <Name>Tail</Name>
          <Len>30</Len>
          <FrontDia>40</FrontDia>
          <RearDia>30</RearDia>
          <ShapeCode>0</ShapeCode>
          <AttachedParts>
            <CustomFinSet>
              <Name>Strakes</Name>
              <FinCount>4</FinCount>
              <PointList>0,0|10,15|30,0</PointList>
            </CustomFinSet>
            <CustomFinSet>
              <Name>Broken</Name>
              <PointList>0,0|x</PointList>
            </CustomFinSet>
            <FinSet>
              <Name>Canted</Name>
              <RootChord>20</RootChord>
              <SemiSpan>10</SemiSpan>
            </FinSet>
          </AttachedParts>
        </Transition>
      </Stage3Parts>
      <Stage2Parts/>
      <Stage1Parts/>
    </RocketDesign>
  </DesignInformation>
</RockSimDocument>
"#;

fn names(rocket: &Rocket, parent: ComponentId) -> Vec<String> {
    rocket
        .children(parent)
        .iter()
        .map(|id| rocket.get(*id).unwrap().name.clone())
        .collect()
}

fn summary(rocket: &Rocket) -> Vec<(String, &'static str, f64)> {
    rocket
        .iter()
        .map(|(_, c)| (c.name.clone(), c.kind.type_name(), c.length()))
        .collect()
}

speculate! {
    describe "import" {
        before {
            let outcome = rocksim::load(DESIGN.as_bytes()).expect("import failed");
            let rocket = &outcome.rocket;
        }

        it "names the rocket and creates only populated stages" {
            assert_eq!(rocket.name(), "Sample");
            assert_eq!(rocket.stage_count(), 1);
            assert_eq!(names(rocket, rocket.stages()[0]), vec!["Nose", "Main", "Tail"]);
        }

        it "converts millimetres and finish codes" {
            let nose = rocket.find_by_name("Nose").unwrap();
            let ComponentKind::NoseCone(nose_cone) = &rocket.get(nose).unwrap().kind else {
                panic!("expected a nose cone");
            };
            assert_eq!(nose_cone.length, 0.1);
            assert_eq!(nose_cone.aft_radius, Radius::Explicit(0.02));
            assert_eq!(nose_cone.shape, TransitionShape::Ogive);
            assert_eq!(nose_cone.finish, Finish::Smooth);

            let tube = rocket.find_by_name("Main").unwrap();
            let ComponentKind::BodyTube(body) = &rocket.get(tube).unwrap().kind else {
                panic!("expected a body tube");
            };
            assert_eq!(body.finish, Finish::Unfinished);
            assert!((body.thickness - 0.001).abs() < 1e-12);
        }

        it "maps location modes onto native positions" {
            let fins = rocket.get(rocket.find_by_name("Fins").unwrap()).unwrap();
            assert_eq!(fins.position, AxialPosition::new(AxialMethod::Bottom, 0.01));
            let block = rocket.get(rocket.find_by_name("Block").unwrap()).unwrap();
            assert_eq!(block.position, AxialPosition::new(AxialMethod::Top, 0.25));
        }

        it "stamps ring usage codes" {
            let block = rocket.get(rocket.find_by_name("Block").unwrap()).unwrap();
            assert_eq!(block.kind.type_name(), "EngineBlock");
            let odd = rocket.get(rocket.find_by_name("Odd").unwrap()).unwrap();
            assert_eq!(odd.kind.type_name(), "CenteringRing");
        }

        it "reads custom fins and converts fins on transitions" {
            let tail = rocket.find_by_name("Tail").unwrap();
            assert_eq!(names(rocket, tail), vec!["Strakes", "Canted"]);
            for id in rocket.children(tail) {
                assert_eq!(rocket.get(*id).unwrap().kind.type_name(), "FreeformFinSet");
            }
            let strakes = rocket.get(rocket.find_by_name("Strakes").unwrap()).unwrap();
            let ComponentKind::FinSet(fin_set) = &strakes.kind else {
                panic!("expected a fin set");
            };
            assert_eq!(fin_set.fin_count, 4);
            assert_eq!(fin_set.shape.points().len(), 3);
        }

        it "warns about the unknown usage code and the broken point list" {
            assert_eq!(outcome.warnings.len(), 2, "{}", outcome.warnings);
            assert!(outcome
                .warnings
                .iter()
                .any(|w| *w == Warning::unknown_value("UsageCode", "7")));
        }
    }

    describe "fatal errors" {
        it "rejects a foreign root element" {
            let result = rocksim::load("<RASAeroDocument/>".as_bytes());
            assert!(matches!(result, Err(ImportError::InvalidDocument(_))));
        }

        it "rejects unclosed documents" {
            let result = rocksim::load("<RockSimDocument><DesignInformation>".as_bytes());
            assert!(result.is_err());
        }
    }

    describe "ring translation" {
        it "shares geometry across usage codes" {
            let mut warnings = WarningSet::new();
            let record = RingRecord {
                outer_diameter: 0.04,
                inner_diameter: 0.0,
                length: 0.005,
                usage_code: 1,
            };
            let bulkhead = translate_ring(&record, &mut warnings);
            let centering = translate_ring(&RingRecord { usage_code: 0, ..record }, &mut warnings);
            assert_eq!(bulkhead.usage, RingUsage::Bulkhead);
            assert_eq!(centering.usage, RingUsage::CenteringRing);
            assert_eq!(bulkhead.outer_radius, centering.outer_radius);
            assert_eq!(bulkhead.inner_radius, Radius::Unset);
            assert!(warnings.is_empty());
        }
    }

    describe "export" {
        it "round-trips through Rocksim" {
            let imported = rocksim::load(DESIGN.as_bytes()).expect("import failed");
            let exported = rocksim::save(&imported.rocket).expect("export failed");
            assert!(exported.warnings.is_empty(), "{}", exported.warnings);
            assert!(exported.xml.contains("<Stage3Parts>"));
            assert!(!exported.xml.contains("<Stage2Parts"));

            let again = rocksim::load(exported.xml.as_bytes()).expect("re-import failed");
            assert!(again.warnings.is_empty(), "{}", again.warnings);

            let before = summary(&imported.rocket);
            let after = summary(&again.rocket);
            assert_eq!(before.len(), after.len());
            for (a, b) in before.iter().zip(&after) {
                assert_eq!((&a.0, a.1), (&b.0, b.1));
                assert!((a.2 - b.2).abs() < 1e-9, "{} length changed", a.0);
            }
        }

        it "skips stages past the third" {
            let mut rocket = Rocket::new("Tall");
            for i in 0..4 {
                let stage = rocket
                    .add_child(rocket.root(), Component::stage(format!("Stage {}", i)))
                    .unwrap();
                rocket
                    .add_child(stage, Component::new("Tube", ComponentKind::BodyTube(BodyTube::default())))
                    .unwrap();
            }
            let exported = rocksim::save(&rocket).expect("export failed");
            assert_eq!(exported.warnings.len(), 1);
            assert!(exported.xml.contains("<Stage1Parts>"));
        }
    }
}
