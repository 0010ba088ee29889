export![
    background,
    camera,
    dirty,
    environment,
    lights,
    material,
    object,
    raster,
    scene,
    settings,
];
